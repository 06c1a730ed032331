//! CST to IR lowering
//!
//! [`lower`] dispatches on the CST node kind. Optional fields that are
//! absent become [`Node::Null`]; a construct whose required field is absent
//! lowers to `Null` as a whole. Lists come in two shapes:
//!
//! - sibling chains (file statements, imports, struct groups and fields,
//!   block statements, keyed elements) start at an anchor child and follow
//!   `next_sibling`, keeping the kinds they care about;
//! - child-indexed lists (arguments, parameters, positional elements) walk
//!   the named children by index.

use crate::{LowerConfig, LowerError, UnmodeledTypePolicy};
use std::{iter, result};
use tracing::{debug, warn};
use va_ir::*;
use va_syntax::{SyntaxKind, SyntaxNodeRef, SyntaxTree};

type Result<T> = result::Result<T, LowerError>;

/// State of one lowering run: the tree being lowered and the identity counter
pub struct LoweringContext<'tree> {
    tree: &'tree SyntaxTree,
    ids: IdGen,
    config: LowerConfig,
}

impl<'tree> LoweringContext<'tree> {
    /// Context for a fresh run over `tree`
    pub fn new(tree: &'tree SyntaxTree, config: LowerConfig) -> Self {
        Self {
            tree,
            ids: IdGen::new(),
            config,
        }
    }

    /// Context whose identities continue after `issued` ones, so records it
    /// builds never collide with an earlier run over the same tree
    pub fn resume(tree: &'tree SyntaxTree, config: LowerConfig, issued: u32) -> Self {
        Self {
            tree,
            ids: IdGen::resume(issued),
            config,
        }
    }

    /// Tree being lowered
    pub fn tree(&self) -> &'tree SyntaxTree {
        self.tree
    }

    /// Options of this run
    pub fn config(&self) -> LowerConfig {
        self.config
    }

    /// Identities handed out so far
    pub fn issued_ids(&self) -> u32 {
        self.ids.issued()
    }

    fn next_id(&mut self) -> NodeId {
        self.ids.next_id()
    }
}

/// Lowers a whole tree with a fresh context
///
/// # Errors
///
/// Returns [`LowerError::UnmodeledType`] under the default policy when a
/// type node has no IR variant.
pub fn lower_file(tree: &SyntaxTree, config: LowerConfig) -> Result<File> {
    let mut ctx = LoweringContext::new(tree, config);
    lower_source_file(&mut ctx)
}

/// Lowers the root of the context's tree
///
/// # Errors
///
/// See [`lower_file`].
#[tracing::instrument(level = "debug", skip_all)]
pub fn lower_source_file(ctx: &mut LoweringContext<'_>) -> Result<File> {
    let root = ctx.tree().root();
    let file = lower_file_node(ctx, root)?;
    debug!(
        statements = file.statements.len(),
        nodes = ctx.issued_ids(),
        "lowered file"
    );
    Ok(file)
}

/// Lowers any CST node; unrecognized and malformed input becomes `Null`
///
/// # Errors
///
/// See [`lower_file`].
pub fn lower(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Node> {
    if node.is_missing() {
        return Ok(Node::Null);
    }

    let lowered = match node.kind() {
        SyntaxKind::SourceFile => lower_file_node(ctx, node)?.into(),
        SyntaxKind::ModuleClause => into_node(lower_module_clause(ctx, node)),
        SyntaxKind::ImportList => lower_import_list(ctx, node).into(),
        SyntaxKind::ImportDeclaration => into_node(lower_import_declaration(ctx, node)),
        SyntaxKind::ImportSpec => into_node(lower_import_spec(ctx, node)),
        SyntaxKind::ImportPath => lower_import_path(ctx, node).into(),
        SyntaxKind::ImportAlias => lower_import_alias(ctx, node),
        SyntaxKind::StructDeclaration => into_node(lower_struct(ctx, node)?),
        SyntaxKind::StructFieldsGroup => lower_fields_group(ctx, node)?.into(),
        SyntaxKind::FieldDeclaration => into_node(lower_field(ctx, node)?),
        SyntaxKind::DefaultValue => lower_default_value(ctx, node)?.into(),
        SyntaxKind::FunctionDeclaration => into_node(lower_function(ctx, node)?),
        SyntaxKind::ParameterList => lower_parameters(ctx, node)?.into(),
        SyntaxKind::ParameterDeclaration => into_node(lower_parameter(ctx, node)?),
        SyntaxKind::Block => lower_block(ctx, node)?.into(),
        SyntaxKind::VarDeclaration => into_node(lower_var_declaration(ctx, node)?),
        SyntaxKind::ExpressionList => lower_expression_list(ctx, node)?.into(),
        SyntaxKind::SimpleStatement => lower_simple_statement(ctx, node)?.into(),
        SyntaxKind::ReturnStatement => lower_return(ctx, node)?.into(),
        SyntaxKind::IfExpression => into_node(lower_if(ctx, node)?),
        SyntaxKind::CallExpression => into_node(lower_call(ctx, node)?),
        SyntaxKind::ArgumentList => lower_arguments(ctx, node)?.into(),
        SyntaxKind::Argument => lower_argument(ctx, node)?.into(),
        SyntaxKind::TypeInitializer => into_node(lower_type_initializer(ctx, node)?),
        SyntaxKind::LiteralValue => lower_literal_value(ctx, node)?.into(),
        SyntaxKind::ElementList => lower_element_list(ctx, node)?.into(),
        SyntaxKind::ShortElementList => lower_short_element_list(ctx, node)?.into(),
        SyntaxKind::KeyedElement => into_node(lower_element(ctx, node)?),
        SyntaxKind::FieldName => into_node(lower_field_name(ctx, node)),
        SyntaxKind::ReferenceExpression => into_node(lower_reference(ctx, node)),
        SyntaxKind::BinaryExpression => lower_binary(ctx, node)?.into(),
        SyntaxKind::ParenthesizedExpression => match node.first_named_child() {
            Some(inner) => lower(ctx, inner)?,
            None => Node::Null,
        },
        SyntaxKind::Identifier => into_node(lower_identifier(ctx, node)),
        SyntaxKind::Literal => lower_literal(ctx, node),
        SyntaxKind::PlainType => lower_type_name(ctx, node)?,
        SyntaxKind::BuiltinType | SyntaxKind::TypeReferenceExpression => lower_type(ctx, node)?,
        kind => {
            debug!(%kind, at = %node.start_point(), "no IR for node, lowering to null");
            Node::Null
        }
    };
    Ok(lowered)
}

fn into_node<T: Into<Node>>(lowered: Option<T>) -> Node {
    lowered.map_or(Node::Null, Into::into)
}

/// Named field that is present and not a recovery placeholder
fn field<'tree>(node: SyntaxNodeRef<'tree>, name: &str) -> Option<SyntaxNodeRef<'tree>> {
    node.child_by_field_name(name)
        .filter(|child| !child.is_missing())
}

fn child_of_kind<'tree>(
    node: SyntaxNodeRef<'tree>,
    kind: &SyntaxKind,
) -> Option<SyntaxNodeRef<'tree>> {
    node.first_child_of_kind(kind)
        .filter(|child| !child.is_missing())
}

fn absent<T>(node: SyntaxNodeRef<'_>, what: &str) -> Option<T> {
    debug!(kind = %node.kind(), at = %node.start_point(), what, "required part absent, lowering to null");
    None
}

/// Whether `node` has an unnamed `keyword` token among its children
fn has_token(node: SyntaxNodeRef<'_>, keyword: &str) -> bool {
    node.children()
        .any(|child| !child.is_named() && !child.is_missing() && child.kind().as_str() == keyword)
}

/// `anchor` and every following sibling
fn sibling_chain<'tree>(
    anchor: Option<SyntaxNodeRef<'tree>>,
) -> impl Iterator<Item = SyntaxNodeRef<'tree>> {
    iter::successors(anchor, SyntaxNodeRef::next_sibling)
}

/// Lowers every named child by index; `lower_child` may skip one by
/// returning `None`
fn lower_indexed<'tree, T>(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'tree>,
    mut lower_child: impl FnMut(&mut LoweringContext<'_>, SyntaxNodeRef<'tree>) -> Result<Option<T>>,
) -> Result<Vec<T>> {
    let mut lowered = Vec::new();
    for index in 0..node.child_count() {
        let Some(child) = node.child(index) else {
            continue;
        };
        if !child.is_named() {
            continue;
        }
        if let Some(item) = lower_child(ctx, child)? {
            lowered.push(item);
        }
    }
    Ok(lowered)
}

/// Statements in a file or block; assertions are dropped from the IR
fn lower_statement(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Option<Node>> {
    match node.kind() {
        SyntaxKind::AssertStatement => {
            debug!(at = %node.start_point(), "skipping assert statement");
            Ok(None)
        }
        _ => lower(ctx, node).map(Some),
    }
}

fn lower_statements<'tree>(
    ctx: &mut LoweringContext<'_>,
    anchor: Option<SyntaxNodeRef<'tree>>,
    skip: &[SyntaxKind],
) -> Result<Vec<Node>> {
    let mut statements = Vec::new();
    for sibling in sibling_chain(anchor) {
        if !sibling.is_named() || sibling.is_missing() || skip.contains(sibling.kind()) {
            continue;
        }
        if let Some(statement) = lower_statement(ctx, sibling)? {
            statements.push(statement);
        }
    }
    Ok(statements)
}

// === File and imports ===

fn lower_file_node(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<File> {
    let module_clause = child_of_kind(node, &SyntaxKind::ModuleClause)
        .map_or(Node::Null, |clause| into_node(lower_module_clause(ctx, clause)));

    let imports = match child_of_kind(node, &SyntaxKind::ImportList) {
        Some(list) => lower_import_list(ctx, list),
        None => ImportList {
            id: ctx.next_id(),
            origin: node.id(),
            declarations: Vec::new(),
        },
    };

    let statements = lower_statements(
        ctx,
        node.child(0),
        &[SyntaxKind::ModuleClause, SyntaxKind::ImportList],
    )?;

    Ok(File {
        id: ctx.next_id(),
        origin: node.id(),
        module_clause,
        imports,
        statements,
    })
}

fn lower_module_clause(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Option<ModuleClause> {
    let Some(name) = field(node, "name").and_then(|name| lower_identifier(ctx, name)) else {
        return absent(node, "name");
    };
    Some(ModuleClause {
        id: ctx.next_id(),
        origin: node.id(),
        name,
    })
}

fn lower_import_list(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> ImportList {
    let anchor = child_of_kind(node, &SyntaxKind::ImportDeclaration);
    let declarations = sibling_chain(anchor)
        .filter(|sibling| sibling.kind() == &SyntaxKind::ImportDeclaration)
        .filter_map(|sibling| lower_import_declaration(ctx, sibling))
        .collect();

    ImportList {
        id: ctx.next_id(),
        origin: node.id(),
        declarations,
    }
}

fn lower_import_declaration(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Option<ImportDeclaration> {
    let Some(spec) = field(node, "spec").and_then(|spec| lower_import_spec(ctx, spec)) else {
        return absent(node, "spec");
    };
    Some(ImportDeclaration {
        id: ctx.next_id(),
        origin: node.id(),
        spec,
    })
}

fn lower_import_spec(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Option<ImportSpec> {
    let Some(path) = field(node, "path").map(|path| lower_import_path(ctx, path)) else {
        return absent(node, "path");
    };
    let alias = field(node, "alias").map_or(Node::Null, |alias| lower_import_alias(ctx, alias));
    Some(ImportSpec {
        id: ctx.next_id(),
        origin: node.id(),
        path,
        alias,
    })
}

fn lower_import_path(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> ImportPath {
    let path = node.text().split_whitespace().collect();
    ImportPath {
        id: ctx.next_id(),
        origin: node.id(),
        path,
    }
}

fn lower_import_alias(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Node {
    let Some(name) = field(node, "name") else {
        return into_node(absent::<ImportAlias>(node, "name"));
    };
    ImportAlias {
        id: ctx.next_id(),
        origin: node.id(),
        name: name.text().to_string(),
    }
    .into()
}

// === Structs ===

fn lower_struct(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<Option<StructDeclaration>> {
    let Some(name) = field(node, "name").and_then(|name| lower_identifier(ctx, name)) else {
        return Ok(absent(node, "name"));
    };

    let mut groups = Vec::new();
    for sibling in sibling_chain(child_of_kind(node, &SyntaxKind::StructFieldsGroup)) {
        if sibling.kind() == &SyntaxKind::StructFieldsGroup {
            groups.push(lower_fields_group(ctx, sibling)?);
        }
    }

    Ok(Some(StructDeclaration {
        id: ctx.next_id(),
        origin: node.id(),
        name,
        groups,
        is_public: has_token(node, "pub"),
    }))
}

fn lower_fields_group(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<StructFieldsGroup> {
    let scope = field(node, "scope");
    let mut fields = Vec::new();
    for sibling in sibling_chain(child_of_kind(node, &SyntaxKind::FieldDeclaration)) {
        if sibling.kind() != &SyntaxKind::FieldDeclaration {
            continue;
        }
        if let Some(field) = lower_field(ctx, sibling)? {
            fields.push(field);
        }
    }

    Ok(StructFieldsGroup {
        id: ctx.next_id(),
        origin: node.id(),
        is_public: scope.is_some_and(|scope| has_token(scope, "pub")),
        is_mutable: scope.is_some_and(|scope| has_token(scope, "mut")),
        fields,
    })
}

fn lower_field(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<Option<FieldDeclaration>> {
    let Some(name) = field(node, "name").and_then(|name| lower_identifier(ctx, name)) else {
        return Ok(absent(node, "name"));
    };
    let ty = match field(node, "type") {
        Some(ty) => lower_type_name(ctx, ty)?,
        None => Node::Null,
    };
    let default_value = match field(node, "default_value") {
        Some(default) => lower_default_value(ctx, default)?.into(),
        None => Node::Null,
    };

    Ok(Some(FieldDeclaration {
        id: ctx.next_id(),
        origin: node.id(),
        name,
        ty,
        default_value,
    }))
}

fn lower_default_value(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<DefaultValue> {
    let value = match field(node, "value") {
        Some(value) => lower(ctx, value)?,
        None => Node::Null,
    };
    Ok(DefaultValue {
        id: ctx.next_id(),
        origin: node.id(),
        value,
    })
}

// === Functions and statements ===

fn lower_function(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<Option<FunctionDeclaration>> {
    let Some(name) = field(node, "name").and_then(|name| lower_identifier(ctx, name)) else {
        return Ok(absent(node, "name"));
    };
    let Some(parameters) = field(node, "parameters") else {
        return Ok(absent(node, "parameters"));
    };
    let parameters = lower_parameters(ctx, parameters)?;
    let result = match field(node, "result") {
        Some(result) => lower_type_name(ctx, result)?,
        None => Node::Null,
    };
    let Some(body) = field(node, "body") else {
        return Ok(absent(node, "body"));
    };
    let body = lower_block(ctx, body)?;

    Ok(Some(FunctionDeclaration {
        id: ctx.next_id(),
        origin: node.id(),
        name,
        parameters,
        result,
        body,
        is_public: has_token(node, "pub"),
    }))
}

fn lower_parameters(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<ParameterList> {
    let parameters = lower_indexed(ctx, node, |ctx, child| {
        if child.kind() == &SyntaxKind::ParameterDeclaration {
            lower_parameter(ctx, child)
        } else {
            Ok(None)
        }
    })?;

    Ok(ParameterList {
        id: ctx.next_id(),
        origin: node.id(),
        parameters,
    })
}

fn lower_parameter(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<Option<ParameterDeclaration>> {
    let Some(name) = field(node, "name").and_then(|name| lower_identifier(ctx, name)) else {
        return Ok(absent(node, "name"));
    };
    let ty = match field(node, "type") {
        Some(ty) => lower_type_name(ctx, ty)?,
        None => Node::Null,
    };

    Ok(Some(ParameterDeclaration {
        id: ctx.next_id(),
        origin: node.id(),
        name,
        ty,
        is_variadic: field(node, "variadic").is_some(),
        is_mutable: has_token(node, "mut"),
    }))
}

fn lower_block(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Block> {
    let statements = lower_statements(ctx, node.first_named_child(), &[])?;
    Ok(Block {
        id: ctx.next_id(),
        origin: node.id(),
        statements,
    })
}

fn lower_var_declaration(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<Option<VarDeclaration>> {
    let Some(var_list) = field(node, "var_list") else {
        return Ok(absent(node, "var_list"));
    };
    let var_list = lower_expression_list(ctx, var_list)?;
    let Some(expression_list) = field(node, "expression_list") else {
        return Ok(absent(node, "expression_list"));
    };
    let expression_list = lower_expression_list(ctx, expression_list)?;

    Ok(Some(VarDeclaration {
        id: ctx.next_id(),
        origin: node.id(),
        var_list,
        expression_list,
    }))
}

fn lower_expression_list(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<ExpressionList> {
    let expressions = lower_indexed(ctx, node, |ctx, child| lower(ctx, child).map(Some))?;
    Ok(ExpressionList {
        id: ctx.next_id(),
        origin: node.id(),
        expressions,
    })
}

fn lower_simple_statement(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<SimpleStatement> {
    let expression = match node.first_named_child() {
        Some(expression) => lower(ctx, expression)?,
        None => Node::Null,
    };
    Ok(SimpleStatement {
        id: ctx.next_id(),
        origin: node.id(),
        expression,
    })
}

fn lower_return(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<ReturnStatement> {
    let expression_list = match child_of_kind(node, &SyntaxKind::ExpressionList) {
        Some(list) => lower_expression_list(ctx, list)?.into(),
        None => Node::Null,
    };
    Ok(ReturnStatement {
        id: ctx.next_id(),
        origin: node.id(),
        expression_list,
    })
}

// === Expressions ===

fn lower_optional(ctx: &mut LoweringContext<'_>, node: Option<SyntaxNodeRef<'_>>) -> Result<Node> {
    node.map_or(Ok(Node::Null), |present| lower(ctx, present))
}

fn lower_if(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Option<IfExpression>> {
    let condition = lower_optional(ctx, field(node, "condition"))?;
    let guard = lower_optional(ctx, field(node, "guard"))?;
    let Some(block) = field(node, "block") else {
        return Ok(absent(node, "block"));
    };
    let block = lower_block(ctx, block)?;
    let else_branch = lower_optional(ctx, field(node, "else_branch"))?;

    Ok(Some(IfExpression {
        id: ctx.next_id(),
        origin: node.id(),
        condition,
        guard,
        block,
        else_branch,
    }))
}

fn lower_call(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Option<CallExpr>> {
    let Some(function) = field(node, "function") else {
        return Ok(absent(node, "function"));
    };
    let function = lower(ctx, function)?;
    let Some(arguments) = field(node, "arguments") else {
        return Ok(absent(node, "arguments"));
    };
    let arguments = lower_arguments(ctx, arguments)?;

    Ok(Some(CallExpr {
        id: ctx.next_id(),
        origin: node.id(),
        function,
        arguments,
    }))
}

fn lower_arguments(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<ArgumentList> {
    let arguments = lower_indexed(ctx, node, |ctx, child| {
        if child.kind() == &SyntaxKind::Argument {
            lower_argument(ctx, child).map(Some)
        } else {
            Ok(None)
        }
    })?;

    Ok(ArgumentList {
        id: ctx.next_id(),
        origin: node.id(),
        arguments,
    })
}

fn lower_argument(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Argument> {
    let expression = lower_optional(ctx, node.first_named_child())?;
    Ok(Argument {
        id: ctx.next_id(),
        origin: node.id(),
        expression,
    })
}

fn lower_type_initializer(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<Option<TypeInitializer>> {
    let ty = match field(node, "type") {
        Some(ty) => lower_type_name(ctx, ty)?,
        None => Node::Null,
    };
    let Some(body) = field(node, "body") else {
        return Ok(absent(node, "body"));
    };
    let value = lower_literal_value(ctx, body)?;

    Ok(Some(TypeInitializer {
        id: ctx.next_id(),
        origin: node.id(),
        ty,
        value,
    }))
}

/// Exactly one of the lists is populated; the other is empty and anchored
/// at the literal value itself
fn lower_literal_value(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<LiteralValue> {
    let keyed = child_of_kind(node, &SyntaxKind::ElementList);
    let positional = keyed
        .is_none()
        .then(|| child_of_kind(node, &SyntaxKind::ShortElementList))
        .flatten();

    let elements = match keyed {
        Some(list) => lower_element_list(ctx, list)?,
        None => ElementList {
            id: ctx.next_id(),
            origin: node.id(),
            elements: Vec::new(),
        },
    };
    let short_elements = match positional {
        Some(list) => lower_short_element_list(ctx, list)?,
        None => ShortElementList {
            id: ctx.next_id(),
            origin: node.id(),
            elements: Vec::new(),
        },
    };

    Ok(LiteralValue {
        id: ctx.next_id(),
        origin: node.id(),
        elements,
        short_elements,
    })
}

fn lower_element_list(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<ElementList> {
    let mut elements = Vec::new();
    for sibling in sibling_chain(child_of_kind(node, &SyntaxKind::KeyedElement)) {
        if sibling.kind() != &SyntaxKind::KeyedElement {
            continue;
        }
        if let Some(element) = lower_element(ctx, sibling)? {
            elements.push(element);
        }
    }

    Ok(ElementList {
        id: ctx.next_id(),
        origin: node.id(),
        elements,
    })
}

fn lower_short_element_list(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Result<ShortElementList> {
    let elements = lower_indexed(ctx, node, |ctx, child| lower(ctx, child).map(Some))?;
    Ok(ShortElementList {
        id: ctx.next_id(),
        origin: node.id(),
        elements,
    })
}

fn lower_element(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Option<Element>> {
    let Some(key) = field(node, "key").and_then(|key| lower_field_name(ctx, key)) else {
        return Ok(absent(node, "key"));
    };
    let value = lower_optional(ctx, field(node, "value"))?;

    Ok(Some(Element {
        id: ctx.next_id(),
        origin: node.id(),
        key,
        value,
    }))
}

fn lower_field_name(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Option<FieldName> {
    let Some(reference) = child_of_kind(node, &SyntaxKind::ReferenceExpression)
        .and_then(|reference| lower_reference(ctx, reference))
    else {
        return absent(node, "reference");
    };
    Some(FieldName {
        id: ctx.next_id(),
        origin: node.id(),
        reference,
    })
}

fn lower_reference(
    ctx: &mut LoweringContext<'_>,
    node: SyntaxNodeRef<'_>,
) -> Option<ReferenceExpression> {
    let Some(identifier) = child_of_kind(node, &SyntaxKind::Identifier)
        .and_then(|identifier| lower_identifier(ctx, identifier))
    else {
        return absent(node, "identifier");
    };
    Some(ReferenceExpression {
        id: ctx.next_id(),
        origin: node.id(),
        identifier,
    })
}

fn lower_binary(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<BinaryExpression> {
    let left = lower_optional(ctx, field(node, "left"))?;
    let operator = field(node, "operator")
        .map(|operator| operator.text().to_string())
        .unwrap_or_default();
    let right = lower_optional(ctx, field(node, "right"))?;

    Ok(BinaryExpression {
        id: ctx.next_id(),
        origin: node.id(),
        left,
        operator,
        right,
    })
}

fn lower_identifier(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Option<Identifier> {
    if node.is_missing() || node.kind() != &SyntaxKind::Identifier {
        return None;
    }
    Some(Identifier {
        id: ctx.next_id(),
        origin: node.id(),
        name: node.text().to_string(),
    })
}

/// Literal kinds are told apart by the wrapper's first child
fn lower_literal(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Node {
    let Some(inner) = node.child(0) else {
        return Node::Null;
    };
    let origin = node.id();
    let text = inner.text();

    match inner.kind() {
        SyntaxKind::InterpretedStringLiteral => StringLiteral {
            id: ctx.next_id(),
            origin,
            value: unquote(text).to_string(),
        }
        .into(),
        SyntaxKind::IntLiteral => IntegerLiteral {
            id: ctx.next_id(),
            origin,
            text: text.to_string(),
        }
        .into(),
        SyntaxKind::FloatLiteral => FloatLiteral {
            id: ctx.next_id(),
            origin,
            text: text.to_string(),
        }
        .into(),
        SyntaxKind::True | SyntaxKind::False => BooleanLiteral {
            id: ctx.next_id(),
            origin,
            value: inner.kind() == &SyntaxKind::True,
        }
        .into(),
        SyntaxKind::None => NoneLiteral {
            id: ctx.next_id(),
            origin,
        }
        .into(),
        kind => {
            debug!(%kind, at = %node.start_point(), "unrecognized literal, lowering to null");
            Node::Null
        }
    }
}

/// Strips one pair of matching quotes
fn unquote(text: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            text.strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(text)
}

// === Types ===

/// Lowers a type in declaration position to a [`TypeName`]
fn lower_type_name(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Node> {
    if node.is_missing() || node.is_error() {
        return Ok(Node::Null);
    }
    let inner = if node.kind() == &SyntaxKind::PlainType {
        let Some(inner) = node.first_named_child() else {
            return Ok(Node::Null);
        };
        inner
    } else {
        node
    };
    let ty = lower_type(ctx, inner)?;

    Ok(TypeName {
        id: ctx.next_id(),
        origin: node.id(),
        ty,
    }
    .into())
}

/// Type dispatch; only builtin and named types have IR variants
fn lower_type(ctx: &mut LoweringContext<'_>, node: SyntaxNodeRef<'_>) -> Result<Node> {
    if node.is_missing() || node.is_error() {
        return Ok(Node::Null);
    }

    match node.kind() {
        SyntaxKind::BuiltinType => Ok(BuiltinType {
            id: ctx.next_id(),
            origin: node.id(),
            name: node.text().to_string(),
        }
        .into()),
        SyntaxKind::TypeReferenceExpression => Ok(SimpleType {
            id: ctx.next_id(),
            origin: node.id(),
            name: node.text().to_string(),
        }
        .into()),
        kind => match ctx.config.unmodeled_types {
            UnmodeledTypePolicy::Fail => {
                let span = node.byte_span();
                Err(LowerError::UnmodeledType {
                    kind: kind.to_string(),
                    at: node.start_point(),
                    span: (span.start as usize, span.len() as usize).into(),
                })
            }
            UnmodeledTypePolicy::Substitute => {
                warn!(%kind, at = %node.start_point(), "unmodeled type, lowering to null");
                Ok(Node::Null)
            }
        },
    }
}
