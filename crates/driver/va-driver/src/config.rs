//! Analysis configuration
//!
//! ```toml
//! [lowering]
//! unmodeled_types = "substitute"
//!
//! [inspections]
//! argument_types = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::de;
use va_inspect::InspectionConfig;
use va_lower::LowerConfig;

/// Failure to load an [`AnalysisConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
    /// The text is not a valid configuration
    #[error("invalid configuration: {0}")]
    Parse(#[from] de::Error),
}

/// Options for one pipeline run; every section is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// `[lowering]` section
    pub lowering: LowerConfig,
    /// `[inspections]` section
    pub inspections: InspectionConfig,
}

impl AnalysisConfig {
    /// Parses a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, unknown sections or
    /// values of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// as [`AnalysisConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_lower::UnmodeledTypePolicy;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AnalysisConfig::from_toml_str("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_sections() {
        let config = AnalysisConfig::from_toml_str(
            "[lowering]\nunmodeled_types = \"substitute\"\n\n[inspections]\nargument_types = false\n",
        )
        .unwrap();

        assert_eq!(config.lowering.unmodeled_types, UnmodeledTypePolicy::Substitute);
        assert!(config.inspections.argument_count);
        assert!(!config.inspections.argument_types);
        assert!(config.inspections.unknown_fields);
    }

    #[test]
    fn test_invalid_documents() {
        let unknown_policy = AnalysisConfig::from_toml_str("[lowering]\nunmodeled_types = \"panic\"\n");
        assert!(matches!(unknown_policy, Err(ConfigError::Parse(_))));

        let unknown_section = AnalysisConfig::from_toml_str("[codegen]\nopt = 3\n");
        assert!(matches!(unknown_section, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let error = AnalysisConfig::load("/nonexistent/vane.toml").unwrap_err();
        assert!(error.to_string().starts_with("failed to read /nonexistent/vane.toml"));
    }
}
