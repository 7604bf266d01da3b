use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::EngineError;
use crate::order::OrderingConvention;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct HouseholdConfig {
    pub name: String,
    pub storages: BTreeMap<String, StorageConfig>,
    #[serde(default)]
    pub offset: Option<OffsetConfig>,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// One named container of ingredient records (a pantry, a shopping list).
///
/// `ordering` is deliberately mandatory: the position conventions differ
/// between storages and guessing a default is exactly how the two get
/// mixed up.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub file: String,
    pub ordering: OrderingConvention,
}

// ---------------------------------------------------------------------------
// Offset pair
// ---------------------------------------------------------------------------

/// Which storage is offset against which: `list` quantities are reduced by
/// `stock` quantities ("I already have some of this").
#[derive(Debug, Clone, Deserialize)]
pub struct OffsetConfig {
    pub list: String,
    pub stock: String,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl HouseholdConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: HouseholdConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.storages.is_empty() {
            return Err(EngineError::ConfigValidation(
                "at least one storage is required".into(),
            ));
        }

        if let Some(ref offset) = self.offset {
            if !self.storages.contains_key(&offset.list) {
                return Err(EngineError::UnknownStorage(format!(
                    "offset: list storage '{}' not found",
                    offset.list
                )));
            }
            if !self.storages.contains_key(&offset.stock) {
                return Err(EngineError::UnknownStorage(format!(
                    "offset: stock storage '{}' not found",
                    offset.stock
                )));
            }
            if offset.list == offset.stock {
                return Err(EngineError::ConfigValidation(
                    "offset list and stock must be distinct storages".into(),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
