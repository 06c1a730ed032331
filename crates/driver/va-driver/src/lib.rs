//! Analysis driver and high-level APIs
//!
//! Runs the whole pipeline over one V source text: parse, lower, resolve,
//! infer and inspect. Everything happens synchronously on the calling
//! thread, and one run shares nothing with another.

mod config;

pub use config::{AnalysisConfig, ConfigError};

use anyhow::Context as _;
use std::fs;
use std::path::Path;
use va_inspect::{Context, Inspector};
use va_ir::{File, NodeRef};
use va_lower::{LowerConfig, LowerError, LoweringContext};
use va_parser::ParseError;
use va_resolve::SymbolTables;
use va_span::NodeSpan;
use va_syntax::SyntaxTree;
use va_ty::TypeMap;

/// A lowered file together with the tree it was lowered from
#[derive(Debug)]
pub struct ParsedFile {
    /// Concrete syntax tree, error nodes included
    pub tree: SyntaxTree,
    /// Lowered IR
    pub file: File,
    /// Syntax errors found while parsing; lowering ran regardless
    pub syntax_errors: Vec<ParseError>,
    config: LowerConfig,
    issued_ids: u32,
}

impl ParsedFile {
    /// Source location of `node`
    pub fn span(&self, node: NodeRef<'_>) -> Option<NodeSpan> {
        va_lower::span(&self.tree, node)
    }

    /// Deepest node of the file containing `offset`
    pub fn find_innermost(&self, offset: u32) -> NodeRef<'_> {
        va_lower::find_innermost(&self.tree, &self.file, offset)
    }

    /// Lowering context for follow-up queries such as
    /// [`va_lower::parent_of`]
    ///
    /// Records lowered through it get identities past the file's own.
    pub fn context(&self) -> LoweringContext<'_> {
        LoweringContext::resume(&self.tree, self.config, self.issued_ids)
    }
}

/// Parses and lowers `source` with the default configuration
///
/// # Errors
///
/// Returns [`LowerError::UnmodeledType`] when the file uses a type the IR
/// cannot represent. Syntax errors never fail.
pub fn parse(source: &str) -> Result<ParsedFile, LowerError> {
    parse_with_config(source, LowerConfig::default())
}

/// Parses and lowers `source`
///
/// # Errors
///
/// See [`parse`]; with [`va_lower::UnmodeledTypePolicy::Substitute`] this
/// does not fail.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_with_config(source: &str, config: LowerConfig) -> Result<ParsedFile, LowerError> {
    let parse_result = va_parser::parse_source(source);

    let mut ctx = LoweringContext::new(&parse_result.tree, config);
    let file = va_lower::lower_source_file(&mut ctx)?;
    let issued_ids = ctx.issued_ids();

    Ok(ParsedFile {
        tree: parse_result.tree,
        file,
        syntax_errors: parse_result.errors,
        config,
        issued_ids,
    })
}

/// Counts of what name resolution found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSummary {
    /// Distinct function names
    pub functions: usize,
    /// Distinct struct names
    pub structs: usize,
    /// Distinct variable names
    pub variables: usize,
    /// Import paths in source order
    pub imports: Vec<String>,
}

impl SymbolSummary {
    fn new(symbols: &SymbolTables<'_>) -> Self {
        Self {
            functions: symbols.function_count(),
            structs: symbols.struct_count(),
            variables: symbols.variable_count(),
            imports: symbols.imports().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Result of a full pipeline run
#[derive(Debug)]
pub struct Analysis {
    /// Tree and IR of the file
    pub parsed: ParsedFile,
    /// What name resolution found
    pub symbols: SymbolSummary,
    /// Inferred labels by node identity
    pub types: TypeMap,
    /// Inspection messages, grouped by inspection in run order
    pub diagnostics: Vec<String>,
}

impl Analysis {
    /// Symbol tables of the analyzed file, rebuilt on demand
    pub fn symbol_tables(&self) -> SymbolTables<'_> {
        va_resolve::resolve(&self.parsed.file)
    }
}

/// Runs the whole pipeline over `source`
///
/// # Errors
///
/// Fails only when lowering does; see [`parse`].
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze(source: &str, config: &AnalysisConfig) -> Result<Analysis, LowerError> {
    let parsed = parse_with_config(source, config.lowering)?;

    let symbols = va_resolve::resolve(&parsed.file);
    let types = va_ty::infer(&parsed.file, &symbols);
    let inspector = Inspector::from_config(&config.inspections);
    let diagnostics = inspector.run(&parsed.file, &Context::new(&symbols, &types));
    let symbols = SymbolSummary::new(&symbols);

    tracing::debug!(
        syntax_errors = parsed.syntax_errors.len(),
        diagnostics = diagnostics.len(),
        "analysis finished"
    );
    Ok(Analysis {
        parsed,
        symbols,
        types,
        diagnostics,
    })
}

/// Reads and analyzes a single file
///
/// # Errors
///
/// Fails when the file cannot be read or cannot be lowered.
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalysisConfig) -> anyhow::Result<Analysis> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    analyze(&source, config).with_context(|| format!("failed to analyze {}", path.display()))
}
