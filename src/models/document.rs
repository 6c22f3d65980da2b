use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key of the schema-version field every persisted config must carry.
pub const FIELD_CONFIG_VERSION: &str = "config-version";

/// Key of the language-selection field every persisted config must carry.
pub const FIELD_LANG: &str = "lang";

/// An ordered configuration document: string keys mapped to loosely-typed values.
///
/// Key order is preserved across load/save round trips so that user-edited
/// files keep their layout.
pub type ConfigDocument = IndexMap<String, ConfigValue>;

/// A single dynamically-typed value inside a [`ConfigDocument`].
///
/// Deserialization is untagged, so variant order matters: `Null` must come
/// first and `Str` must come after the numeric variants, otherwise every
/// scalar would land in `Str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ConfigValue>),
    Map(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Returns the integer value if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string value if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable name of the value's type, used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Int(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
            ConfigValue::List(_) => "list",
            ConfigValue::Map(_) => "map",
        }
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}
