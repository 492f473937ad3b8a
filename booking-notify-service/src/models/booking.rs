use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// A booking submitted by the website form.
///
/// Every field is optional and loosely typed: numbers and booleans are
/// accepted and rendered as text, while `null`, `""`, `0` and `false` read as
/// "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookingRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub note: Option<String>,
    /// Pre-rendered text that replaces the template entirely.
    #[serde(default, deserialize_with = "lenient_text")]
    pub raw_message: Option<String>,
}

impl BookingRequest {
    /// Interpret a parsed request body. Objects map field by field; an array
    /// carries no named fields and yields an empty booking.
    pub fn from_json(body: Value) -> Result<Self, serde_json::Error> {
        match body {
            Value::Array(_) => Ok(Self::default()),
            other => serde_json::from_value(other),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(&n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Integers print as written; floats use `f64`'s `Display`, so an integral
/// float such as `1e3` reads `1000` rather than `1000.0`.
fn number_text(n: &Number) -> String {
    match (n.as_i64(), n.as_u64(), n.as_f64()) {
        (Some(i), _, _) => i.to_string(),
        (_, Some(u), _) => u.to_string(),
        (_, _, Some(f)) => f.to_string(),
        _ => n.to_string(),
    }
}
