//! `key=value` assignments applied to drafts and records.
//!
//! Values are taken as JSON when they parse as JSON and the target field
//! accepts it (`quantity=12`, `plant_id=null`); otherwise the raw text is
//! used as a string. A field that already holds a string always receives
//! the raw text, so `serial_number=0042` stays `"0042"`.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("invalid assignment '{input}': expected key=value")]
    InvalidAssignment { input: String },

    #[error("unknown field '{field}' (known fields: {known})")]
    UnknownField { field: String, known: String },

    #[error("value for '{field}' does not fit the field: {message}")]
    InvalidValue { field: String, message: String },

    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: String },

    #[error("{message}")]
    Serialize { message: String },
}

/// One parsed `key=value` pair. The value keeps its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: String,
    pub raw: String,
}

impl FromStr for FieldAssignment {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((field, raw)) if !field.trim().is_empty() => Ok(FieldAssignment {
                field: field.trim().to_string(),
                raw: raw.to_string(),
            }),
            _ => Err(DraftError::InvalidAssignment {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.raw)
    }
}

/// Apply `assignments` in order to a copy of `base`.
pub fn apply_assignments<T>(base: &T, assignments: &[FieldAssignment]) -> Result<T, DraftError>
where
    T: Serialize + DeserializeOwned,
{
    let mut object = to_object(base)?;
    for assignment in assignments {
        let current = object
            .get(&assignment.field)
            .ok_or_else(|| DraftError::UnknownField {
                field: assignment.field.clone(),
                known: object.keys().cloned().collect::<Vec<_>>().join(", "),
            })?;
        let as_text = Value::String(assignment.raw.clone());
        let candidates = match (current, serde_json::from_str::<Value>(&assignment.raw)) {
            (Value::String(_), _) | (_, Err(_)) => vec![as_text],
            (_, Ok(parsed)) => vec![parsed, as_text],
        };

        let mut last_error = None;
        let mut accepted = false;
        for candidate in candidates {
            let mut trial = object.clone();
            trial.insert(assignment.field.clone(), candidate);
            match serde_json::from_value::<T>(Value::Object(trial.clone())) {
                Ok(_) => {
                    object = trial;
                    accepted = true;
                    break;
                }
                Err(e) => last_error = Some(e.to_string()),
            }
        }
        if !accepted {
            return Err(DraftError::InvalidValue {
                field: assignment.field.clone(),
                message: last_error.unwrap_or_default(),
            });
        }
    }
    from_object(object)
}

/// Overlay the top-level fields of `overlay` onto a copy of `base`.
///
/// Fields absent from `overlay` keep their value from `base`.
pub fn merge_json<T>(base: &T, overlay: &Value) -> Result<T, DraftError>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(fields) = overlay else {
        return Err(DraftError::NotAnObject {
            found: json_type(overlay).to_string(),
        });
    };
    let mut object = to_object(base)?;
    for (key, value) in fields {
        object.insert(key.clone(), value.clone());
    }
    from_object(object)
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, DraftError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DraftError::NotAnObject {
            found: json_type(&other).to_string(),
        }),
        Err(e) => Err(DraftError::Serialize {
            message: e.to_string(),
        }),
    }
}

fn from_object<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, DraftError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| DraftError::Serialize {
        message: e.to_string(),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
