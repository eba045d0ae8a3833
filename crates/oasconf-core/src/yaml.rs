//! YAML-to-JSON value conversion.
//!
//! API description documents use only the JSON-compatible subset of YAML,
//! but `serde_yaml` still surfaces them through its own value tree. This
//! module converts that tree into `serde_json::Value` so the locator and
//! the schema validator can share one representation.

use serde_json::Value;

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Non-string mapping keys are stringified; YAML tags are ignored and the
/// inner value converted. Floats that JSON cannot represent (NaN,
/// infinities) are rejected.
pub fn to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => number_to_json(n),
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(to_json_value)
            .collect::<Result<Vec<Value>, String>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                object.insert(scalar_key(key)?, to_json_value(value)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => to_json_value(&tagged.value),
    }
}

fn number_to_json(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    match n.as_f64().and_then(serde_json::Number::from_f64) {
        Some(f) => Ok(Value::Number(f)),
        None => Err(format!("number {n} has no JSON representation")),
    }
}

/// Response status codes and version labels show up as bare numbers or
/// booleans in mapping-key position; JSON keys them as strings.
fn scalar_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("mapping key {other:?} is not a scalar")),
    }
}
