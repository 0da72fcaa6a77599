use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Renders a loosely typed parameter value as the string stored in the job config.
///
/// Strings are passed through unchanged, every other value is written in its literal
/// form (`1`, `2.5`, `true`, `null`, or compact JSON for arrays and objects).
pub fn stringify_parameter(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// User metadata attached to the job and made available to every task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalJobParameters(BTreeMap<String, String>);

impl GlobalJobParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self(
            parameters
                .into_iter()
                .map(|(k, v)| (k.into(), stringify_parameter(&v.into())))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

impl From<BTreeMap<String, String>> for GlobalJobParameters {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify_scalars() {
        assert_eq!(stringify_parameter(&json!(1)), "1");
        assert_eq!(stringify_parameter(&json!(-7)), "-7");
        assert_eq!(stringify_parameter(&json!(2.5)), "2.5");
        assert_eq!(stringify_parameter(&json!(true)), "true");
        assert_eq!(stringify_parameter(&json!("x")), "x");
        assert_eq!(stringify_parameter(&json!("")), "");
        assert_eq!(stringify_parameter(&Value::Null), "null");
    }

    #[test]
    fn test_stringify_nested_as_json() {
        assert_eq!(stringify_parameter(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(stringify_parameter(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_from_values_coerces() {
        let params = GlobalJobParameters::from_values(vec![("a", json!(1)), ("b", json!("x"))]);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("x"));
        assert_eq!(params.get("c"), None);
        assert_eq!(params.len(), 2);
    }
}
