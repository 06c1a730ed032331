//! Arena-backed concrete syntax tree

use crate::SyntaxKind;
use crate::conversion::convert;
use la_arena::{Arena, Idx};
use std::{fmt, ptr};
use va_span::{LineIndex, NodeSpan, Point, Span};

/// Stable handle to a node inside a [`SyntaxTree`]
pub type SyntaxNodeId = Idx<SyntaxNodeData>;

/// Storage for one CST node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNodeData {
    kind: SyntaxKind,
    named: bool,
    missing: bool,
    span: Span,
    start: Point,
    end: Point,
    field: Option<&'static str>,
    parent: Option<SyntaxNodeId>,
    index: u32,
    children: Vec<SyntaxNodeId>,
}

/// A concrete syntax tree together with the source text it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    source: String,
    nodes: Arena<SyntaxNodeData>,
    root: SyntaxNodeId,
}

impl SyntaxTree {
    /// Copies a tree-sitter tree into an owned [`SyntaxTree`].
    ///
    /// Kinds, field names, named flags and error/missing markers are kept as
    /// the grammar reports them, so any grammar emitting tree-sitter-v node
    /// names lowers directly.
    pub fn from_tree_sitter(tree: &tree_sitter::Tree, source: &str) -> Self {
        let mut builder = SyntaxTreeBuilder::new(source);
        let mut cursor = tree.walk();
        let root = convert(&mut cursor, &mut builder);
        builder.finish(root)
    }

    /// The `source_file` node
    pub fn root(&self) -> SyntaxNodeRef<'_> {
        self.node(self.root)
    }

    /// View of the node behind `id`
    pub fn node(&self, id: SyntaxNodeId) -> SyntaxNodeRef<'_> {
        SyntaxNodeRef { tree: self, id }
    }

    /// Text the tree was built from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes, tokens included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// S-expression rendering of the named nodes, tree-sitter style
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(self.root(), &mut out);
        out
    }
}

fn write_sexp(node: SyntaxNodeRef<'_>, out: &mut String) {
    if node.is_missing() {
        out.push_str("(MISSING ");
        out.push_str(node.kind().as_str());
        out.push(')');
        return;
    }
    out.push('(');
    out.push_str(node.kind().as_str());
    for child in node.named_children() {
        out.push(' ');
        if let Some(field) = child.field_name() {
            out.push_str(field);
            out.push_str(": ");
        }
        write_sexp(child, out);
    }
    out.push(')');
}

/// Borrowed view of one node; all queries are side-effect free
#[derive(Clone, Copy)]
pub struct SyntaxNodeRef<'tree> {
    tree: &'tree SyntaxTree,
    id: SyntaxNodeId,
}

impl<'tree> SyntaxNodeRef<'tree> {
    fn data(&self) -> &'tree SyntaxNodeData {
        &self.tree.nodes[self.id]
    }

    /// Arena handle of this node
    pub fn id(&self) -> SyntaxNodeId {
        self.id
    }

    /// Tree this node belongs to
    pub fn tree(&self) -> &'tree SyntaxTree {
        self.tree
    }

    /// Grammar kind
    pub fn kind(&self) -> &'tree SyntaxKind {
        &self.data().kind
    }

    /// Named nodes are grammar rules; unnamed ones are keywords and punctuation
    pub fn is_named(&self) -> bool {
        self.data().named
    }

    /// A zero-width node inserted by error recovery for an expected token
    pub fn is_missing(&self) -> bool {
        self.data().missing
    }

    /// An `ERROR` node wrapping input the parser skipped
    pub fn is_error(&self) -> bool {
        self.data().kind == SyntaxKind::Error
    }

    /// Whether this node or any descendant is an error or missing node
    pub fn has_error(&self) -> bool {
        self.is_error() || self.is_missing() || self.children().any(|child| child.has_error())
    }

    /// Number of children, tokens included
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Child at `index`, tokens included
    pub fn child(&self, index: usize) -> Option<Self> {
        self.data()
            .children
            .get(index)
            .map(|id| self.tree.node(*id))
    }

    /// All children in source order
    pub fn children(&self) -> impl Iterator<Item = Self> + use<'tree> {
        let tree = self.tree;
        self.data().children.iter().map(move |id| tree.node(*id))
    }

    /// Children that are grammar rules
    pub fn named_children(&self) -> impl Iterator<Item = Self> + use<'tree> {
        self.children().filter(Self::is_named)
    }

    /// First named child, whatever its field
    pub fn first_named_child(&self) -> Option<Self> {
        self.named_children().next()
    }

    /// First child of `kind`, named or not
    pub fn first_child_of_kind(&self, kind: &SyntaxKind) -> Option<Self> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Child hanging off the field `name`
    pub fn child_by_field_name(&self, name: &str) -> Option<Self> {
        self.children()
            .find(|child| child.field_name() == Some(name))
    }

    /// Field under which this node hangs off its parent
    pub fn field_name(&self) -> Option<&'static str> {
        self.data().field
    }

    /// Enclosing node, `None` at the root
    pub fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// Following child of the same parent
    pub fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        parent.child(self.data().index as usize + 1)
    }

    /// Byte offset of the first byte
    pub fn start_byte(&self) -> u32 {
        self.data().span.start
    }

    /// Byte offset one past the last byte
    pub fn end_byte(&self) -> u32 {
        self.data().span.end
    }

    /// Byte range covered
    pub fn byte_span(&self) -> Span {
        self.data().span
    }

    /// Line and column of the first byte
    pub fn start_point(&self) -> Point {
        self.data().start
    }

    /// Line and column one past the last byte
    pub fn end_point(&self) -> Point {
        self.data().end
    }

    /// Byte and line/column location together
    pub fn node_span(&self) -> NodeSpan {
        let span = self.byte_span();
        NodeSpan {
            offset: span.start,
            len: span.len(),
            start: self.start_point(),
            end: self.end_point(),
        }
    }

    /// Source text covered by this node
    pub fn text(&self) -> &'tree str {
        self.tree
            .source
            .get(self.data().span.range())
            .unwrap_or_default()
    }
}

impl PartialEq for SyntaxNodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNodeRef<'_> {}

impl fmt::Debug for SyntaxNodeRef<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.byte_span();
        write!(formatter, "{}@{}..{}", self.kind(), span.start, span.end)
    }
}

/// Child handed to [`SyntaxTreeBuilder::node`], optionally under a field name
#[derive(Debug, Clone, Copy)]
pub struct Child {
    /// Field name in the parent, if any
    pub field: Option<&'static str>,
    /// The child node
    pub id: SyntaxNodeId,
}

impl Child {
    /// Child without a field name
    pub fn plain(id: SyntaxNodeId) -> Self {
        Self { field: None, id }
    }

    /// Child under `field`
    pub fn field(field: &'static str, id: SyntaxNodeId) -> Self {
        Self {
            field: Some(field),
            id,
        }
    }
}

/// Builds a [`SyntaxTree`] bottom-up: children are allocated before the
/// node that owns them.
pub struct SyntaxTreeBuilder {
    source: String,
    lines: LineIndex,
    nodes: Arena<SyntaxNodeData>,
}

impl SyntaxTreeBuilder {
    /// Starts a tree over `source`
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            lines: LineIndex::new(source),
            nodes: Arena::new(),
        }
    }

    fn alloc(&mut self, kind: SyntaxKind, named: bool, missing: bool, span: Span) -> SyntaxNodeId {
        let start = self.lines.point(span.start);
        let end = self.lines.point(span.end);
        self.nodes.alloc(SyntaxNodeData {
            kind,
            named,
            missing,
            span,
            start,
            end,
            field: None,
            parent: None,
            index: 0,
            children: Vec::new(),
        })
    }

    /// Allocates a childless node covering `span`
    pub fn leaf(&mut self, kind: SyntaxKind, named: bool, span: Span) -> SyntaxNodeId {
        self.alloc(kind, named, false, span)
    }

    /// Allocates a zero-width node standing in for an expected but absent token
    pub fn missing(&mut self, kind: SyntaxKind, named: bool, offset: u32) -> SyntaxNodeId {
        self.alloc(kind, named, true, Span::empty(offset))
    }

    /// Allocates a named node over `children`.
    ///
    /// The node spans its first to last child; a childless node sits at
    /// `fallback` with zero width.
    pub fn node(&mut self, kind: SyntaxKind, children: Vec<Child>, fallback: u32) -> SyntaxNodeId {
        let span = children
            .iter()
            .map(|child| self.nodes[child.id].span)
            .reduce(Span::cover)
            .unwrap_or_else(|| Span::empty(fallback));
        self.node_with_span(kind, true, span, children)
    }

    /// Allocates a node with an explicit span over `children`
    pub fn node_with_span(
        &mut self,
        kind: SyntaxKind,
        named: bool,
        span: Span,
        children: Vec<Child>,
    ) -> SyntaxNodeId {
        let id = self.alloc(kind, named, false, span);
        let mut ids = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            let data = &mut self.nodes[child.id];
            data.parent = Some(id);
            data.field = child.field;
            data.index = index as u32;
            ids.push(child.id);
        }
        self.nodes[id].children = ids;
        id
    }

    /// Span of an already allocated node
    pub fn span(&self, id: SyntaxNodeId) -> Span {
        self.nodes[id].span
    }

    /// Seals the arena with `root` on top
    pub fn finish(self, root: SyntaxNodeId) -> SyntaxTree {
        SyntaxTree {
            source: self.source,
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    /// Builds `(source_file (module_clause name: (identifier)))` for `module foo`
    fn module_tree() -> SyntaxTree {
        let mut builder = SyntaxTreeBuilder::new("module foo\n");
        let keyword = builder.leaf(SyntaxKind::Other("module".into()), false, Span::new(0, 6));
        let name = builder.leaf(SyntaxKind::Identifier, true, Span::new(7, 10));
        let clause = builder.node(
            SyntaxKind::ModuleClause,
            vec![Child::plain(keyword), Child::field("name", name)],
            0,
        );
        let root = builder.node_with_span(
            SyntaxKind::SourceFile,
            true,
            Span::new(0, 11),
            vec![Child::plain(clause)],
        );
        builder.finish(root)
    }

    #[test]
    fn test_queries() {
        let tree = module_tree();
        let clause = tree.root().child(0).unwrap();

        assert_eq!(clause.kind(), &SyntaxKind::ModuleClause);
        assert_eq!(clause.child_count(), 2);
        assert!(!clause.child(0).unwrap().is_named());

        let name = clause.child_by_field_name("name").unwrap();
        assert_eq!(name.text(), "foo");
        assert_eq!(name.start_point(), Point::new(0, 7));
        assert_eq!(name.end_point(), Point::new(0, 10));
        assert_eq!(name.parent(), Some(clause));
        assert_eq!(clause.child(0).unwrap().next_sibling(), Some(name));
        assert!(name.next_sibling().is_none());
        assert!(clause.child_by_field_name("alias").is_none());
    }

    #[test]
    fn test_node_span_covers_children() {
        let tree = module_tree();
        let clause = tree.root().child(0).unwrap();

        assert_eq!(clause.byte_span(), Span::new(0, 10));
        assert_eq!(clause.node_span().len, 10);
    }

    #[test]
    fn test_sexp() {
        expect!["(source_file (module_clause name: (identifier)))"]
            .assert_eq(&module_tree().to_sexp());
    }

    #[test]
    fn test_missing_node() {
        let mut builder = SyntaxTreeBuilder::new("(");
        let open = builder.leaf(SyntaxKind::Other("(".into()), false, Span::new(0, 1));
        let close = builder.missing(SyntaxKind::Other(")".into()), false, 1);
        let root = builder.node(
            SyntaxKind::ParameterList,
            vec![Child::plain(open), Child::plain(close)],
            0,
        );
        let tree = builder.finish(root);

        assert!(tree.root().has_error());
        assert!(tree.root().child(1).unwrap().is_missing());
        assert_eq!(tree.root().child(1).unwrap().text(), "");
    }
}
