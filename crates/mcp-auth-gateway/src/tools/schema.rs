//! Tool input schemas and argument coercion.
//!
//! Schemas are declared once per tool and serve two purposes: they are published in
//! `tools/list` as JSON Schema, and they drive argument validation before a handler
//! runs. A required argument that is missing is an `InvalidParams` error; an optional
//! one takes its declared default or stays absent.

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use crate::error::RpcError;

/// Declared argument type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Number,
    String,
}

impl ArgKind {
    const fn json_type(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Number(f64),
    Text(String),
}

impl ArgValue {
    fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => json!(n),
            Self::Text(s) => json!(s),
        }
    }
}

/// One declared argument.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: &'static str,
    kind: ArgKind,
    description: &'static str,
    required: bool,
    default: Option<ArgValue>,
}

impl ArgSpec {
    /// Optional number argument.
    #[must_use]
    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ArgKind::Number, description, required: false, default: None }
    }

    /// Optional string argument.
    #[must_use]
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ArgKind::String, description, required: false, default: None }
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Default text for an optional string argument.
    #[must_use]
    pub fn default_text(mut self, value: &str) -> Self {
        self.default = Some(ArgValue::Text(value.to_string()));
        self
    }

    fn coerce(&self, value: &Value) -> Result<ArgValue, RpcError> {
        let invalid =
            || RpcError::InvalidParams(format!("Argument '{}' must be a {}", self.name, self.kind.json_type()));

        match (self.kind, value) {
            (ArgKind::Number, Value::Number(n)) => n.as_f64().map(ArgValue::Number).ok_or_else(invalid),
            (ArgKind::Number, Value::String(s)) => {
                s.trim().parse::<f64>().map(ArgValue::Number).map_err(|_| invalid())
            }
            (ArgKind::String, Value::String(s)) => Ok(ArgValue::Text(s.clone())),
            (ArgKind::String, Value::Number(n)) => Ok(ArgValue::Text(n.to_string())),
            (ArgKind::String, Value::Bool(b)) => Ok(ArgValue::Text(b.to_string())),
            _ => Err(invalid()),
        }
    }
}

/// Object schema made of named arguments, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    args: Vec<ArgSpec>,
}

impl InputSchema {
    /// Empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument.
    #[must_use]
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    /// JSON Schema representation published in `tools/list`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for spec in &self.args {
            let mut property = json!({
                "type": spec.kind.json_type(),
                "description": spec.description,
            });
            if let Some(default) = &spec.default {
                property["default"] = default.to_json();
            }
            properties.insert(spec.name.to_string(), property);
        }

        let mut schema = json!({ "type": "object", "properties": properties });
        let required: Vec<&str> = self.args.iter().filter(|a| a.required).map(|a| a.name).collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// Validate and coerce call arguments. Undeclared arguments are ignored and
    /// `null` counts as absent.
    pub fn coerce(&self, arguments: &Map<String, Value>) -> Result<ToolArguments, RpcError> {
        let mut values = HashMap::with_capacity(self.args.len());

        for spec in &self.args {
            match arguments.get(spec.name).filter(|v| !v.is_null()) {
                Some(raw) => {
                    values.insert(spec.name, spec.coerce(raw)?);
                }
                None => {
                    if let Some(default) = &spec.default {
                        values.insert(spec.name, default.clone());
                    } else if spec.required {
                        return Err(RpcError::InvalidParams(format!(
                            "Missing required argument: {}",
                            spec.name
                        )));
                    }
                }
            }
        }

        Ok(ToolArguments { values })
    }
}

/// Arguments after schema validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: HashMap<&'static str, ArgValue>,
}

impl ToolArguments {
    /// Number argument, if present.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ArgValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// String argument, if present.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> InputSchema {
        InputSchema::new()
            .arg(ArgSpec::number("a", "First number").required())
            .arg(ArgSpec::string("unit", "Unit").default_text("cm"))
            .arg(ArgSpec::number("scale", "Optional scale"))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_json_schema_shape() {
        let json = schema().to_json();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["a"]["type"], "number");
        assert_eq!(json["properties"]["unit"]["default"], "cm");
        assert_eq!(json["required"], json!(["a"]));
    }

    #[test]
    fn test_no_required_member_when_all_optional() {
        let json = InputSchema::new().arg(ArgSpec::string("region", "Region")).to_json();
        assert!(json.get("required").is_none());
    }

    #[test]
    fn test_numbers_from_numbers_and_strings() {
        let parsed = schema().coerce(&args(json!({"a": 2}))).unwrap();
        assert_eq!(parsed.number("a"), Some(2.0));

        let parsed = schema().coerce(&args(json!({"a": " 2.5 "}))).unwrap();
        assert_eq!(parsed.number("a"), Some(2.5));
    }

    #[test]
    fn test_missing_required_is_invalid_params() {
        let err = schema().coerce(&args(json!({}))).unwrap_err();
        assert_eq!(err.code(), -32602);
        assert_eq!(err.data(), "Missing required argument: a");

        let err = schema().coerce(&args(json!({"a": null}))).unwrap_err();
        assert_eq!(err.code(), -32602);
    }

    #[test]
    fn test_uncoercible_number() {
        let err = schema().coerce(&args(json!({"a": "two"}))).unwrap_err();
        assert_eq!(err.data(), "Argument 'a' must be a number");

        assert!(schema().coerce(&args(json!({"a": true}))).is_err());
        assert!(schema().coerce(&args(json!({"a": [1]}))).is_err());
    }

    #[test]
    fn test_defaults_and_optional() {
        let parsed = schema().coerce(&args(json!({"a": 1, "extra": "ignored"}))).unwrap();
        assert_eq!(parsed.text("unit"), Some("cm"));
        assert_eq!(parsed.number("scale"), None);
        assert_eq!(parsed.text("extra"), None);
    }

    #[test]
    fn test_strings_accept_scalars() {
        let parsed = schema().coerce(&args(json!({"a": 1, "unit": 12}))).unwrap();
        assert_eq!(parsed.text("unit"), Some("12"));
    }
}
