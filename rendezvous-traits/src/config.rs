//! Analysis configuration
//!
//! Read from TOML with kebab-case keys. Every key is optional:
//!
//! ```toml
//! reserved-functions = ["update-context"]
//! property-test-prefix = "test-"
//! invariant-prefix = "invariant-"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Bookkeeping functions injected by the test harness, never analyzed
    #[serde(default = "default_reserved_functions")]
    pub reserved_functions: Vec<String>,

    #[serde(default = "default_property_test_prefix")]
    pub property_test_prefix: String,

    #[serde(default = "default_invariant_prefix")]
    pub invariant_prefix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reserved_functions: default_reserved_functions(),
            property_test_prefix: default_property_test_prefix(),
            invariant_prefix: default_invariant_prefix(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded analysis configuration");
        Ok(config)
    }

    pub fn is_reserved(&self, function: &str) -> bool {
        self.reserved_functions.iter().any(|name| name == function)
    }
}

fn default_reserved_functions() -> Vec<String> {
    vec!["update-context".to_string()]
}

fn default_property_test_prefix() -> String {
    "test-".to_string()
}

fn default_invariant_prefix() -> String {
    "invariant-".to_string()
}
