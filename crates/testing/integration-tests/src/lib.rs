//! Integration test utilities for the V analyzer
//!
//! A test project is a directory under `test-projects/` holding `main.v`,
//! the diagnostics it must produce in `expected.txt` (one per line), and
//! optionally a `vane.toml` analysis configuration.

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use va_driver::{Analysis, AnalysisConfig};

/// One project loaded from disk
#[derive(Debug, Clone)]
pub struct TestProject {
    /// Directory name
    pub name: String,
    /// Contents of `main.v`
    pub source: String,
    /// Contents of `vane.toml`, or the default configuration
    pub config: AnalysisConfig,
    /// Expected diagnostics in order
    pub expected: Vec<String>,
}

impl TestProject {
    /// Loads a project directory
    ///
    /// # Errors
    ///
    /// Returns an error if `main.v` or `expected.txt` is missing, or the
    /// configuration does not parse
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let source = fs::read_to_string(dir.join("main.v"))
            .with_context(|| format!("{name}: missing main.v"))?;
        let expected = fs::read_to_string(dir.join("expected.txt"))
            .with_context(|| format!("{name}: missing expected.txt"))?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        let config_path = dir.join("vane.toml");
        let config = if config_path.exists() {
            AnalysisConfig::load(&config_path)?
        } else {
            AnalysisConfig::default()
        };

        Ok(Self {
            name,
            source,
            config,
            expected,
        })
    }

    /// Runs the full pipeline over the project's source
    ///
    /// # Errors
    ///
    /// Returns an error if lowering fails
    pub fn analyze(&self) -> Result<Analysis> {
        va_driver::analyze(&self.source, &self.config)
            .with_context(|| format!("{}: analysis failed", self.name))
    }
}

/// Directory holding the test projects of this crate
pub fn projects_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-projects")
}

/// Every project under `root`, sorted by name
///
/// # Errors
///
/// Returns an error if directory traversal or a project load fails
pub fn discover(root: impl AsRef<Path>) -> Result<Vec<TestProject>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root.as_ref())? {
        let path = entry?.path();
        if path.join("main.v").exists() {
            dirs.push(path);
        }
    }
    dirs.sort();
    dirs.into_iter().map(TestProject::load).collect()
}

/// Lowers `source` with the default configuration, panicking on failure
///
/// Intended for tests only.
#[allow(clippy::expect_used, reason = "test helper")]
pub fn lower(source: &str) -> va_driver::ParsedFile {
    va_driver::parse(source).expect("source should lower")
}
