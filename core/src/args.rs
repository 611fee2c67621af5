//! Per-call argument map.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Argument values for one invocation, keyed by parameter name.
///
/// A value counts as provided unless it is `null`, an empty string, an empty
/// array or an empty object. Unprovided values never reach the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    values: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Provided value for `name`, or `None` if absent or blank.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| is_provided(value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Build arguments from a JSON object as sent by a tool-calling host.
    ///
    /// `null` is accepted as "no arguments".
    pub fn from_json(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            other => Err(ApiError::invalid_argument(
                "arguments",
                format!("expected a JSON object, got {other}"),
            )),
        }
    }

    /// Build arguments from a typed parameter struct.
    pub fn from_params<P: Serialize>(params: &P) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Self::from_json(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CallArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn is_provided(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn blank_values_are_not_provided() {
        let args = CallArgs::new()
            .with("null", Value::Null)
            .with("empty", "")
            .with("list", json!([]))
            .with("map", json!({}))
            .with("zero", 0)
            .with("no", false);
        assert!(args.get("null").is_none());
        assert!(args.get("empty").is_none());
        assert!(args.get("list").is_none());
        assert!(args.get("map").is_none());
        assert_eq!(args.get("zero"), Some(&json!(0)));
        assert_eq!(args.get("no"), Some(&json!(false)));
        assert!(args.get("absent").is_none());
    }

    #[test]
    fn from_json_accepts_object_and_null() {
        let args = CallArgs::from_json(json!({"limit": 5})).unwrap();
        assert_eq!(args.get("limit"), Some(&json!(5)));
        assert_eq!(CallArgs::from_json(Value::Null).unwrap(), CallArgs::new());
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = CallArgs::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { .. }));
    }

    #[test]
    fn from_params_skips_none_fields() {
        #[derive(Serialize)]
        struct Params {
            account_id: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            cursor: Option<String>,
        }
        let args = CallArgs::from_params(&Params {
            account_id: "A1".to_string(),
            cursor: None,
        })
        .unwrap();
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["account_id"]);
    }
}
