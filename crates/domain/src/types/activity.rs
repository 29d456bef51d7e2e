//! Raw activity records as returned by `GET /activity`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DaytraceError, Result};

/// One activity record for a day.
///
/// The API gives no field guarantees, so every known field is an optional
/// raw JSON value and everything else lands in `extra`. A slot is `None`
/// only when the key was absent; an explicit `null` is kept as
/// `Some(Value::Null)`, so cached payloads round-trip without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    // Duration-bearing fields, in seconds
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time_span: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,

    /// Provider fields without a typed slot (`user_id`, `application_id`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize a key that is present, `null` included.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Activity {
    /// Look up a field by its wire name, typed slots first.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let slot = match name {
            "id" => &self.id,
            "name" => &self.name,
            "time_span" => &self.time_span,
            "duration" => &self.duration,
            "time" => &self.time,
            "duration_seconds" => &self.duration_seconds,
            "time_spent" => &self.time_spent,
            "start_time" => &self.start_time,
            "end_time" => &self.end_time,
            other => return self.extra.get(other),
        };
        slot.as_ref()
    }

    /// Numeric value of a field. Strings are not coerced: `"30"` is `None`.
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match self.field(name)? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// String value of a timestamp-like field.
    pub fn timestamp_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Display name, when the provider sent one as a string.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }
}

/// Interpret a JSON document as a list of activities.
///
/// An array maps element-wise, a single object becomes a one-element list
/// and `null` is an empty day. Any other shape is rejected.
pub fn parse_activities(value: Value) -> Result<Vec<Activity>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(invalid_record))
            .collect(),
        Value::Object(_) => Ok(vec![serde_json::from_value(value).map_err(invalid_record)?]),
        Value::Null => Ok(Vec::new()),
        other => Err(DaytraceError::Internal(format!(
            "unexpected activity payload: expected array or object, got {}",
            json_kind(&other)
        ))),
    }
}

fn invalid_record(err: serde_json::Error) -> DaytraceError {
    DaytraceError::Internal(format!("invalid activity record: {err}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
