//! Template variables: the typed parameters a template declares.
//!
//! A [`Variable`] is built once per declaration found in a template manifest and never changes
//! afterwards. Its [`VarType`] is either declared explicitly or inferred from the default value.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed set of variable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    String,
    Boolean,
    Number,
    List,
    Dictionary,
}

impl VarType {
    /// Infers the type of an example value.
    ///
    /// Booleans are checked before numbers so a `true` default never becomes numeric.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Boolean(_) => VarType::Boolean,
            Value::String(_) => VarType::String,
            Value::Number(_) => VarType::Number,
            Value::List(_) => VarType::List,
            Value::Dictionary(_) => VarType::Dictionary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::String => "string",
            VarType::Boolean => "boolean",
            VarType::Number => "number",
            VarType::List => "list",
            VarType::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VarType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "string" => Ok(VarType::String),
            "boolean" => Ok(VarType::Boolean),
            "number" => Ok(VarType::Number),
            "list" => Ok(VarType::List),
            "dictionary" => Ok(VarType::Dictionary),
            other => Err(format!("unknown variable type '{other}'")),
        }
    }
}

/// A variable default or a bound value.
///
/// Serialized untagged so a binding can be handed to the template engine as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Value>),
    Dictionary(IndexMap<String, Value>),
}

impl Value {
    pub fn var_type(&self) -> VarType {
        VarType::infer(self)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Converts a JSON value; `null` has no counterpart and yields `None`.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Value::Boolean(b)),
            serde_json::Value::Number(n) => Some(Value::Number(n)),
            serde_json::Value::String(s) => Some(Value::String(s)),
            serde_json::Value::Array(items) => {
                Some(Value::List(items.into_iter().filter_map(Value::from_json).collect()))
            }
            serde_json::Value::Object(map) => Some(Value::Dictionary(
                map.into_iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::List(_) | Value::Dictionary(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// A single declared template parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    required: bool,
    default: Option<Value>,
    var_type: VarType,
}

impl Variable {
    /// Creates a variable, resolving its type.
    ///
    /// # Arguments
    /// * `name` - Variable name, also used as the `--name` flag
    /// * `required` - Whether binding fails when the flag is absent
    /// * `default` - Example value, used as the parser fallback and for type inference
    /// * `declared_type` - Explicit type; taken verbatim when present
    ///
    /// # Errors
    /// * `Error::TypeInferenceError` if the variable is optional and has neither a type nor a default
    pub fn new<S: Into<String>>(
        name: S,
        required: bool,
        default: Option<Value>,
        declared_type: Option<VarType>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidTemplateError(
                "Variable name must not be empty".to_string(),
            ));
        }

        let var_type = match (declared_type, &default) {
            (Some(declared), _) => declared,
            (None, Some(value)) => VarType::infer(value),
            // Required variables without any hint are plain text
            (None, None) if required => VarType::String,
            (None, None) => return Err(Error::TypeInferenceError { name }),
        };

        Ok(Self { name, required, default, var_type })
    }

    /// Creates a variable from a manifest declaration whose type is still a string.
    ///
    /// # Errors
    /// * `Error::TypeInferenceError` if `declared_type` is not one of the known types, or no
    ///   type can be determined
    pub fn declare<S: Into<String>>(
        name: S,
        required: bool,
        default: Option<Value>,
        declared_type: Option<&str>,
    ) -> Result<Self> {
        let name = name.into();
        let declared_type = match declared_type {
            Some(t) => Some(
                t.parse::<VarType>()
                    .map_err(|_| Error::TypeInferenceError { name: name.clone() })?,
            ),
            None => None,
        };
        Self::new(name, required, default, declared_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    /// Engine-internal variables are hidden from documentation but still bound.
    pub fn is_internal(&self) -> bool {
        self.name.starts_with('_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_each_shape() {
        assert_eq!(VarType::infer(&Value::from(true)), VarType::Boolean);
        assert_eq!(VarType::infer(&Value::from("x")), VarType::String);
        assert_eq!(VarType::infer(&Value::from(3)), VarType::Number);
        assert_eq!(VarType::infer(&Value::from(vec![Value::from("a")])), VarType::List);
        assert_eq!(
            VarType::infer(&Value::from_json(json!({"a": 1})).unwrap()),
            VarType::Dictionary
        );
    }

    #[test]
    fn test_from_json_null_is_absent() {
        assert_eq!(Value::from_json(json!(null)), None);
        assert_eq!(Value::from_json(json!(1.5)).unwrap().var_type(), VarType::Number);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from("run.sh").to_string(), "run.sh");
        assert_eq!(
            Value::from(vec![Value::from("a"), Value::from(1)]).to_string(),
            r#"["a",1]"#
        );
    }

    #[test]
    fn test_var_type_round_trip_names() {
        for t in ["string", "boolean", "number", "list", "dictionary"] {
            assert_eq!(t.parse::<VarType>().unwrap().to_string(), t);
        }
        assert!("integer".parse::<VarType>().is_err());
    }
}
