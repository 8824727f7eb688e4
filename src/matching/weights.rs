use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::{Gender, Lifestyle, Personality};

/// Environment override for the weight artifact location.
pub const WEIGHT_CONFIG_ENV: &str = "RM_WEIGHT_CONFIG";
/// Repository-relative default used when no override is set.
pub const DEFAULT_WEIGHT_CONFIG_PATH: &str = "config/profile-weights.json";

/// One profile attribute value as seen by the weight tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAttribute {
    Gender(Gender),
    Lifestyle(Lifestyle),
    Personality(Personality),
    Pets(bool),
    Smoking(bool),
}

#[derive(Debug, Error)]
pub enum WeightConfigError {
    #[error("failed to read weight config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("weight config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("weight config root must be an object of attribute tables")]
    RootNotObject,
    #[error("weight table {attribute:?} must be an object of integer weights")]
    TableNotObject { attribute: String },
    #[error("weight {attribute}.{value} must be an integer")]
    WeightNotInteger { attribute: String, value: String },
}

/// Immutable per-attribute weight tables.
///
/// Loaded once at process start and passed into the engine at construction
/// time. Lookups never fail: a value with no configured entry weighs 0,
/// which is how attributes the product chooses not to score stay neutral.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightConfig {
    gender: HashMap<Gender, i64>,
    lifestyle: HashMap<Lifestyle, i64>,
    personality: HashMap<Personality, i64>,
    pets: HashMap<bool, i64>,
    smoking: HashMap<bool, i64>,
}

impl WeightConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WeightConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| WeightConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, WeightConfigError> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Build the typed tables from the raw artifact structure.
    ///
    /// Structural problems (root or table not an object, non-integer leaf)
    /// are fatal. A table for an attribute the engine does not score, or a
    /// value key that does not name a known variant, is skipped with a
    /// warning instead: it can never be looked up, so it contributes
    /// nothing either way.
    pub fn from_value(value: Value) -> Result<Self, WeightConfigError> {
        let Value::Object(tables) = value else {
            return Err(WeightConfigError::RootNotObject);
        };

        let mut config = WeightConfig::default();
        for (attribute, table) in tables {
            let entries = integer_entries(&attribute, table)?;
            match attribute.as_str() {
                "gender" => fill_table(&mut config.gender, &attribute, entries),
                "lifestyle" => fill_table(&mut config.lifestyle, &attribute, entries),
                "personality" => fill_table(&mut config.personality, &attribute, entries),
                "pets" => fill_table(&mut config.pets, &attribute, entries),
                "smoking" => fill_table(&mut config.smoking, &attribute, entries),
                _ => warn!(
                    attribute = attribute.as_str(),
                    "ignoring weight table for unscored attribute"
                ),
            }
        }

        Ok(config)
    }

    /// Configured weight for one attribute value; 0 when the attribute or
    /// the specific value has no entry.
    pub fn weight(&self, attribute: &ProfileAttribute) -> i64 {
        match attribute {
            ProfileAttribute::Gender(value) => self.gender.get(value),
            ProfileAttribute::Lifestyle(value) => self.lifestyle.get(value),
            ProfileAttribute::Personality(value) => self.personality.get(value),
            ProfileAttribute::Pets(value) => self.pets.get(value),
            ProfileAttribute::Smoking(value) => self.smoking.get(value),
        }
        .copied()
        .unwrap_or(0)
    }
}

/// Artifact location: `RM_WEIGHT_CONFIG` when set, the repository-relative
/// default otherwise.
pub fn default_config_path() -> PathBuf {
    std::env::var_os(WEIGHT_CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WEIGHT_CONFIG_PATH))
}

fn integer_entries(
    attribute: &str,
    table: Value,
) -> Result<Vec<(String, i64)>, WeightConfigError> {
    let Value::Object(entries) = table else {
        return Err(WeightConfigError::TableNotObject {
            attribute: attribute.to_string(),
        });
    };

    entries
        .into_iter()
        .map(|(value, weight)| match weight.as_i64() {
            Some(weight) => Ok((value, weight)),
            None => Err(WeightConfigError::WeightNotInteger {
                attribute: attribute.to_string(),
                value,
            }),
        })
        .collect()
}

fn fill_table<K>(table: &mut HashMap<K, i64>, attribute: &str, entries: Vec<(String, i64)>)
where
    K: FromStr + Eq + Hash,
{
    for (value, weight) in entries {
        match value.parse::<K>() {
            Ok(key) => {
                table.insert(key, weight);
            }
            Err(_) => warn!(
                attribute,
                value = value.as_str(),
                "ignoring weight for unknown attribute value"
            ),
        }
    }
}
