//! Position and parent queries over lowered nodes
//!
//! IR records keep no parent pointers and no positions of their own. Both
//! are recovered through the syntax node a record was lowered from.

use crate::lower::{LoweringContext, lower};
use crate::LowerError;
use std::iter;
use va_ir::{Accept, Node, NodeRef};
use va_span::NodeSpan;
use va_syntax::{SyntaxKind, SyntaxNodeRef, SyntaxTree};

/// Source location of a lowered node; `None` for the null node
///
/// Lists that were synthesized empty are anchored at the start of the node
/// that owns them, with zero length.
pub fn span(tree: &SyntaxTree, node: NodeRef<'_>) -> Option<NodeSpan> {
    let origin = tree.node(node.origin()?);
    let span = origin.node_span();

    if is_synthesized_empty(node, origin) {
        return Some(NodeSpan {
            offset: span.offset,
            len: 0,
            start: span.start,
            end: span.start,
        });
    }
    Some(span)
}

/// Empty lists lowered without a syntax node of their own borrow their
/// owner's node as origin
fn is_synthesized_empty(node: NodeRef<'_>, origin: SyntaxNodeRef<'_>) -> bool {
    let own_kind = match node {
        NodeRef::ImportList(list) if list.declarations.is_empty() => SyntaxKind::ImportList,
        NodeRef::ElementList(list) if list.elements.is_empty() => SyntaxKind::ElementList,
        NodeRef::ShortElementList(list) if list.elements.is_empty() => {
            SyntaxKind::ShortElementList
        }
        _ => return false,
    };
    origin.kind() != &own_kind
}

/// Deepest node under `root` whose span contains `offset`
///
/// Returns [`NodeRef::Null`] when no node contains the offset.
pub fn find_innermost<'ast, T: Accept>(
    tree: &SyntaxTree,
    root: &'ast T,
    offset: u32,
) -> NodeRef<'ast> {
    let mut innermost = NodeRef::Null;
    root.accept(&mut |node: NodeRef<'ast>| {
        if span(tree, node).is_some_and(|span| span.contains(offset)) {
            innermost = node;
        }
        true
    });
    innermost
}

/// Re-lowers the syntactic parent of `node`
///
/// The result is a fresh record with identities drawn from `ctx`; it is not
/// the record that owns `node`. Parentheses are looked through. The file
/// root has no parent and yields [`Node::Null`].
///
/// # Errors
///
/// Fails like [`crate::lower_file`] when the parent contains an unmodeled
/// type.
pub fn parent_of(ctx: &mut LoweringContext<'_>, node: NodeRef<'_>) -> Result<Node, LowerError> {
    let Some(origin) = node.origin() else {
        return Ok(Node::Null);
    };
    let tree = ctx.tree();
    let origin = tree.node(origin);

    if is_synthesized_empty(node, origin) {
        return lower(ctx, origin);
    }

    let parent = iter::successors(origin.parent(), SyntaxNodeRef::parent)
        .find(|parent| parent.kind() != &SyntaxKind::ParenthesizedExpression);
    parent.map_or(Ok(Node::Null), |parent| lower(ctx, parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LowerConfig, lower_file};
    use va_ir::NodeKind;

    const SOURCE: &str = "struct Foo {\n\tname string\n}\n\nfn main() {\n\tf := Foo{ name: 'foo' }\n\tg := (f)\n}\n";

    #[test]
    fn test_span_of_identifier() {
        let tree = lang_v::parse(SOURCE);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let Node::StructDeclaration(foo) = &file.statements[0] else {
            panic!("expected struct");
        };

        let name = span(&tree, NodeRef::from(&foo.name)).unwrap();
        assert_eq!((name.offset, name.len), (7, 3));
        assert_eq!(name.start.to_string(), "1:8");
        assert_eq!(span(&tree, NodeRef::Null), None);
    }

    #[test]
    fn test_empty_list_is_zero_width() {
        let tree = lang_v::parse(SOURCE);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();

        let imports = span(&tree, NodeRef::from(&file.imports)).unwrap();
        assert_eq!((imports.offset, imports.len), (0, 0));
    }

    #[test]
    fn test_find_innermost_identifier() {
        let tree = lang_v::parse(SOURCE);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let offset = SOURCE.find("f :=").unwrap() as u32;

        let found = find_innermost(&tree, &file, offset);
        let NodeRef::Identifier(identifier) = found else {
            panic!("expected identifier, got {:?}", found.kind());
        };
        assert_eq!(identifier.name, "f");
    }

    #[test]
    fn test_find_innermost_outside_everything() {
        let tree = lang_v::parse("x := 1\n\n\n");
        let file = lower_file(&tree, LowerConfig::default()).unwrap();

        assert_eq!(find_innermost(&tree, &file, 8).kind(), NodeKind::File);
        assert_eq!(find_innermost(&tree, &file, 100).kind(), NodeKind::Null);
    }

    #[test]
    fn test_parent_of_field_is_group() {
        let tree = lang_v::parse(SOURCE);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let Node::StructDeclaration(foo) = &file.statements[0] else {
            panic!("expected struct");
        };
        let name = foo.field("name").unwrap();

        let mut ctx = LoweringContext::new(&tree, LowerConfig::default());
        let parent = parent_of(&mut ctx, NodeRef::from(name)).unwrap();
        let Node::StructFieldsGroup(group) = &parent else {
            panic!("expected fields group, got {:?}", parent.kind());
        };
        assert_eq!(group.fields.len(), 1);
    }

    #[test]
    fn test_parent_of_looks_through_parentheses() {
        let tree = lang_v::parse(SOURCE);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let offset = SOURCE.find("(f)").unwrap() as u32 + 1;
        let NodeRef::Identifier(target) = find_innermost(&tree, &file, offset) else {
            panic!("expected identifier");
        };
        let mut ctx = LoweringContext::new(&tree, LowerConfig::default());

        let reference = parent_of(&mut ctx, NodeRef::from(target)).unwrap();
        assert_eq!(reference.kind(), NodeKind::ReferenceExpression);
        let list = parent_of(&mut ctx, reference.as_node_ref()).unwrap();
        assert_eq!(list.kind(), NodeKind::ExpressionList);
    }

    #[test]
    fn test_parent_of_root_and_null() {
        let tree = lang_v::parse(SOURCE);
        let file = lower_file(&tree, LowerConfig::default()).unwrap();
        let mut ctx = LoweringContext::new(&tree, LowerConfig::default());

        assert!(parent_of(&mut ctx, NodeRef::from(&file)).unwrap().is_null());
        assert!(parent_of(&mut ctx, NodeRef::Null).unwrap().is_null());
        let imports = parent_of(&mut ctx, NodeRef::from(&file.imports)).unwrap();
        assert_eq!(imports.kind(), NodeKind::File);
    }
}
