//! Lowering configuration

use serde::{Deserialize, Serialize};

/// What to do with a type node the IR has no variant for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmodeledTypePolicy {
    /// Stop lowering with [`crate::LowerError::UnmodeledType`]
    #[default]
    Fail,
    /// Log a warning and lower the type to the null node
    Substitute,
}

/// Options for one lowering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerConfig {
    /// Handling of types the IR cannot represent
    pub unmodeled_types: UnmodeledTypePolicy,
}

impl LowerConfig {
    /// Configuration that never fails on unmodeled types
    pub fn lenient() -> Self {
        Self {
            unmodeled_types: UnmodeledTypePolicy::Substitute,
        }
    }
}
