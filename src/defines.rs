//! The set of active flags consulted by `#ifdef` and `#ifndef`.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

/// Flag names that are currently defined. Only presence matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineSet {
    names: BTreeSet<String>,
}

#[derive(Debug, Error)]
pub enum DefinesError {
    #[error("defines must be a JSON object or an array of names, found {found}")]
    UnexpectedShape { found: &'static str },
    #[error("defines array may only contain strings, found {found}")]
    NonStringName { found: &'static str },
    #[error("invalid defines JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DefineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Removes `name`; absent names are not an error.
    pub fn remove(&mut self, name: &str) {
        self.names.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Reads defines from JSON text. See [`DefineSet::from_json_value`].
    pub fn from_json_str(text: &str) -> Result<Self, DefinesError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Every key of an object is defined, whatever its value; an array
    /// lists the defined names directly.
    pub fn from_json_value(value: &Value) -> Result<Self, DefinesError> {
        match value {
            Value::Object(map) => Ok(map.keys().cloned().collect()),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name.clone()),
                    other => Err(DefinesError::NonStringName {
                        found: json_type_name(other),
                    }),
                })
                .collect(),
            other => Err(DefinesError::UnexpectedShape {
                found: json_type_name(other),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<S: Into<String>> FromIterator<S> for DefineSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for DefineSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}
