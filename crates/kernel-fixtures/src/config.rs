//! Batch builder options.

use serde::Deserialize;

use crate::error::{FixtureError, Result};

const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Options controlling how JSON payloads are turned into batches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    /// Accept a non-array top-level payload as a single scalar when exactly
    /// one column is declared and its shape allows a scalar.
    pub bare_scalars: bool,
    /// Maximum depth of nested types (list, struct, map) accepted by the decoder.
    pub max_nesting_depth: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            bare_scalars: true,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl FixtureConfig {
    /// Parse and validate a JSON config document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Parse`] for malformed JSON or unknown keys and
    /// [`FixtureError::Config`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every option is usable.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Config`] describing the first invalid option.
    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(FixtureError::Config {
                message: "max_nesting_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
