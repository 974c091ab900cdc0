//! Validation of raw merge parameters.
//!
//! Parameters arrive untyped (whatever the user wrote in their settings).
//! [`MergeConfig::from_params`] checks them once and produces a fully
//! defaulted, typed config; nothing downstream sees the raw value.

use crate::error::ConfigError;
use crate::traits::FilterParams;
use serde_json::Value;

/// One child filter taking part in a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildFilter {
    pub name: String,
    /// Keep at most this many of the child's items; 0 keeps all of them
    pub limit: usize,
    /// Always > 0
    pub weight: f64,
}

impl ChildFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limit: 0,
            weight: 1.0,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Validated merge parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    pub filters: Vec<ChildFilter>,
    pub unique: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            unique: true,
        }
    }
}

impl MergeConfig {
    /// Validate a raw value. Anything other than an object has no `filters`.
    pub fn from_value(raw: &Value) -> Result<Self, ConfigError> {
        match raw {
            Value::Object(params) => Self::from_params(params),
            other => Err(ConfigError::FiltersNotArray {
                found: describe(Some(other)),
            }),
        }
    }

    /// Validate a raw parameter map.
    ///
    /// ## Rules
    /// - `filters` must be an array (no default here)
    /// - each entry is a name string or an object with a string `name`
    /// - `limit` defaults to 0, must be a number; values <= 0 mean unlimited
    /// - `weight` defaults to 1.0, must be a number > 0
    /// - `unique` defaults to true when absent, otherwise must be a boolean
    pub fn from_params(params: &FilterParams) -> Result<Self, ConfigError> {
        let entries = match params.get("filters") {
            Some(Value::Array(entries)) => entries,
            other => {
                return Err(ConfigError::FiltersNotArray {
                    found: describe(other),
                });
            }
        };

        let filters = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_child(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let unique = match params.get("unique") {
            None => true,
            Some(Value::Bool(unique)) => *unique,
            other => {
                return Err(ConfigError::InvalidUnique {
                    found: describe(other),
                });
            }
        };

        Ok(Self { filters, unique })
    }
}

fn parse_child(index: usize, entry: &Value) -> Result<ChildFilter, ConfigError> {
    let record = match entry {
        Value::String(name) => return Ok(ChildFilter::named(name.clone())),
        Value::Object(record) => record,
        other => {
            return Err(ConfigError::InvalidChild {
                index,
                found: describe(Some(other)),
            });
        }
    };

    let name = match record.get("name") {
        Some(Value::String(name)) => name.clone(),
        other => {
            return Err(ConfigError::InvalidName {
                index,
                found: describe(other),
            });
        }
    };

    let limit = match record.get("limit") {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => to_limit(n.as_f64().unwrap_or(0.0)),
        other => {
            return Err(ConfigError::InvalidLimit {
                name,
                found: describe(other),
            });
        }
    };

    let weight = match record.get("weight") {
        None | Some(Value::Null) => 1.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        other => {
            return Err(ConfigError::InvalidWeight {
                name,
                found: describe(other),
            });
        }
    };
    // Also rejects NaN
    if !(weight > 0.0) {
        return Err(ConfigError::NonPositiveWeight { name, weight });
    }

    Ok(ChildFilter {
        name,
        limit,
        weight,
    })
}

/// Fractional limits truncate toward zero; non-positive ones disable the cap.
fn to_limit(raw: f64) -> usize {
    if raw.is_finite() && raw > 0.0 {
        raw.trunc() as usize
    } else {
        0
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing".to_string(),
        Some(value) => value.to_string(),
    }
}
