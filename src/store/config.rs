use crate::error::ConfigError;
use crate::ids::{DEFAULT_SUFFIX_LEN, MIN_SUFFIX_LEN};
use crate::model::Position;
use serde::{Deserialize, Serialize};

/// Tunable behaviour of a `GraphStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Offset applied to a duplicated node so it does not cover the original.
    pub duplicate_offset: Position,
    /// Name given to new nodes. Falls back to the catalog label when unset.
    pub default_node_name: Option<String>,
    /// Length of the random part of generated ids.
    pub id_suffix_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            duplicate_offset: Position::new(40.0, 40.0),
            default_node_name: None,
            id_suffix_length: DEFAULT_SUFFIX_LEN,
        }
    }
}

impl StoreConfig {
    /// Parses and validates settings from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let offset = self.duplicate_offset;
        if !offset.x.is_finite() || !offset.y.is_finite() || offset.x < 0.0 || offset.y < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "duplicateOffset must be finite and non-negative, got ({}, {})",
                offset.x, offset.y
            )));
        }
        if self.id_suffix_length < MIN_SUFFIX_LEN {
            return Err(ConfigError::Invalid(format!(
                "idSuffixLength must be at least {}, got {}",
                MIN_SUFFIX_LEN, self.id_suffix_length
            )));
        }
        Ok(())
    }
}
