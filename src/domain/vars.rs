//! Conversion of key/value collections into Mandrill `name`/`content` pairs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::request::RecipientVariables;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A merge variable or editable-region value.
pub struct Variable {
    pub name: String,
    pub content: Value,
}

impl Variable {
    pub fn new(name: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Input accepted by [`to_variable_list`].
///
/// `Unsupported` stands for any input that is not a string-keyed map; it converts to an
/// empty list instead of failing.
pub enum VariableSource {
    Strings(BTreeMap<String, String>),
    Values(BTreeMap<String, Value>),
    Unsupported,
}

impl From<BTreeMap<String, String>> for VariableSource {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self::Strings(value)
    }
}

impl From<HashMap<String, String>> for VariableSource {
    fn from(value: HashMap<String, String>) -> Self {
        Self::Strings(value.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for VariableSource {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Values(value)
    }
}

impl From<HashMap<String, Value>> for VariableSource {
    fn from(value: HashMap<String, Value>) -> Self {
        Self::Values(value.into_iter().collect())
    }
}

impl From<serde_json::Map<String, Value>> for VariableSource {
    fn from(value: serde_json::Map<String, Value>) -> Self {
        Self::Values(value.into_iter().collect())
    }
}

impl From<Value> for VariableSource {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into(),
            _ => Self::Unsupported,
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for VariableSource {
    fn from(value: [(&str, &str); N]) -> Self {
        Self::Strings(
            value
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        )
    }
}

/// Convert `source` into one [`Variable`] per key, ordered by name.
pub fn to_variable_list(source: impl Into<VariableSource>) -> Vec<Variable> {
    match source.into() {
        VariableSource::Strings(map) => map
            .into_iter()
            .map(|(name, content)| Variable::new(name, content))
            .collect(),
        VariableSource::Values(map) => map
            .into_iter()
            .map(|(name, content)| Variable { name, content })
            .collect(),
        VariableSource::Unsupported => Vec::new(),
    }
}

/// Convert `source` into per-recipient merge variables for `email`.
pub fn for_recipient(
    email: impl Into<String>,
    source: impl Into<VariableSource>,
) -> RecipientVariables {
    RecipientVariables {
        rcpt: email.into(),
        vars: to_variable_list(source),
    }
}
