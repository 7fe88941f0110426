//! Typed query settings

use crate::{Error, Result};
use std::collections::BTreeMap;

/// Value of a single ClickHouse setting
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Boolean (sent as 0/1)
    Bool(bool),
    /// Floating point
    Float(f64),
    /// String
    String(String),
}

impl SettingValue {
    /// Render as a ClickHouse literal, for `SET name = <literal>`
    pub fn to_literal(&self) -> String {
        match self {
            Self::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", u8::from(*v)),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u64> for SettingValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Settings applied to every query on a connection, ordered by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings(BTreeMap<String, SettingValue>);

impl Settings {
    /// Empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a setting
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SettingValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a setting
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.0.get(name)
    }

    /// Number of settings
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no settings
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.0.iter()
    }

    /// Reject names that cannot appear bare in a `SET` statement
    pub fn validate(&self) -> Result<()> {
        match self.0.keys().find(|name| !is_valid_name(name)) {
            Some(name) => Err(Error::Config(format!(
                "invalid setting name '{}': expected [A-Za-z0-9_]+",
                name
            ))),
            None => Ok(()),
        }
    }
}

/// Setting names are non-empty runs of `[A-Za-z0-9_]`
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl<K: Into<String>, V: Into<SettingValue>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
