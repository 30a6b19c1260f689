//! Historical recipe records — the structured input to history analysis,
//! and the conversion from the loosely typed JSON a recipe database exports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// A star rating as it arrived from the history source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    Number(f64),
    Text(String),
}

impl RawRating {
    /// Whole-star value in `1..=5`, or `None` for anything unusable.
    pub fn stars(&self) -> Option<u8> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if value.fract() == 0.0 && (1.0..=5.0).contains(&value) {
            Some(value as u8)
        } else {
            None
        }
    }
}

impl From<&str> for RawRating {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for RawRating {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<f64> for RawRating {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One past meal. Every field except `name` may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalRecipeRecord {
    pub name: String,
    pub cuisines: Vec<String>,
    pub meal_types: Vec<String>,
    pub difficulty: Option<String>,
    pub rating: Option<RawRating>,
    pub prep_minutes: Option<f64>,
    pub cook_minutes: Option<f64>,
}

impl HistoricalRecipeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cuisines = cuisines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<RawRating>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    /// Validated star rating, if the record carries a usable one.
    pub fn stars(&self) -> Option<u8> {
        self.rating.as_ref().and_then(RawRating::stars)
    }

    /// Build a record from one exported database row.
    ///
    /// Only the outer shape is checked: `value` must be an object. Individual
    /// fields that are missing or malformed come through as absent.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ValidationError::InvalidInputShape {
                detail: format!("expected a record object, got {}", json_kind(value)),
            })?;

        Ok(Self {
            name: field(obj, &["Name", "name"])
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            cuisines: field(obj, &["Cuisine", "cuisine", "cuisines"])
                .map(string_list)
                .unwrap_or_default(),
            meal_types: field(obj, &["Type", "type", "meal_type", "meal_types"])
                .map(string_list)
                .unwrap_or_default(),
            difficulty: field(obj, &["Difficulty", "difficulty"])
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            rating: field(obj, &["Rating", "rating"]).and_then(raw_rating),
            prep_minutes: field(obj, &["Prep Time", "prep_time", "prep_minutes"])
                .and_then(minutes),
            cook_minutes: field(obj, &["Cook Time", "cook_time", "cook_minutes"])
                .and_then(minutes),
        })
    }
}

/// Convert an exported JSON array of rows into records.
pub fn records_from_json(value: &Value) -> Result<Vec<HistoricalRecipeRecord>, ValidationError> {
    let rows = value
        .as_array()
        .ok_or_else(|| ValidationError::InvalidInputShape {
            detail: format!("expected an array of records, got {}", json_kind(value)),
        })?;
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            HistoricalRecipeRecord::from_json(row).map_err(|_| ValidationError::InvalidInputShape {
                detail: format!("record {i} is {}, expected an object", json_kind(row)),
            })
        })
        .collect()
}

/// Parse JSON text and convert it with [`records_from_json`].
pub fn records_from_json_str(text: &str) -> Result<Vec<HistoricalRecipeRecord>, ValidationError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::InvalidInputShape {
            detail: format!("not valid JSON: {e}"),
        })?;
    records_from_json(&value)
}

fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| obj.get(*name))
        .filter(|v| !v.is_null())
}

/// Multi-select values arrive as an array, a JSON-encoded array, or one bare string.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let s = s.trim();
            if s.starts_with('[') {
                if let Ok(items) = serde_json::from_str::<Vec<Value>>(s) {
                    return string_list(&Value::Array(items));
                }
            }
            if s.is_empty() {
                Vec::new()
            } else {
                vec![s.to_string()]
            }
        }
        _ => Vec::new(),
    }
}

fn raw_rating(value: &Value) -> Option<RawRating> {
    match value {
        Value::Number(n) => n.as_f64().map(RawRating::Number),
        Value::String(s) => Some(RawRating::Text(s.clone())),
        _ => None,
    }
}

fn minutes(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
