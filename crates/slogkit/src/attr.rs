//! Typed key/value attributes attached to records and sinks

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 string
    String(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Nested, ordered attributes
    Group(Vec<Attr>),
}

/// A key and a typed value
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: Value,
}

impl Attr {
    /// Create an attribute from anything convertible to a [`Value`]
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// String attribute
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    /// Signed integer attribute
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Int(value))
    }

    /// Unsigned integer attribute
    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::Uint(value))
    }

    /// Float attribute
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::Float(value))
    }

    /// Boolean attribute
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// Group attribute. An empty key inlines the members into the parent.
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, Value::Group(attrs.into_iter().collect()))
    }

    /// Whether the attribute contributes nothing to output.
    ///
    /// An empty key drops a scalar; an empty group is dropped whatever its key.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Group(attrs) => attrs.iter().all(Self::is_empty),
            _ => self.key.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}={}", attr.key, attr.value)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Uint(v as u64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(v: Vec<Attr>) -> Self {
        Self::Group(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match v {
            Json::Null => Self::String("null".to_owned()),
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Uint(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::String(Json::Array(items).to_string()),
            Json::Object(map) => Self::Group(map.into_iter().map(|(k, v)| Attr::new(k, v)).collect()),
        }
    }
}

/// Serializes attributes as map entries, applying the empty-key and
/// empty-group rules of [`Attr::is_empty`].
pub(crate) struct AttrsMap<'a>(pub(crate) &'a [Attr]);

impl Serialize for AttrsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        write_entries(&mut map, self.0)?;
        map.end()
    }
}

pub(crate) fn write_entries<M: SerializeMap>(map: &mut M, attrs: &[Attr]) -> Result<(), M::Error> {
    for attr in attrs {
        if attr.is_empty() {
            continue;
        }
        match &attr.value {
            Value::Group(members) if attr.key.is_empty() => write_entries(map, members)?,
            Value::Group(members) => map.serialize_entry(&attr.key, &AttrsMap(members))?,
            value => map.serialize_entry(&attr.key, value)?,
        }
    }
    Ok(())
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Uint(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Group(attrs) => AttrsMap(attrs).serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_rules() {
        assert!(Attr::string("", "x").is_empty());
        assert!(Attr::group("g", Vec::<Attr>::new()).is_empty());
        assert!(Attr::group("g", [Attr::string("", "x")]).is_empty());
        assert!(!Attr::group("", [Attr::int("n", 1)]).is_empty());
        assert!(!Attr::bool("ok", false).is_empty());
    }

    #[test]
    fn serializes_groups_as_objects() {
        let value = Value::Group(vec![
            Attr::string("a", "x"),
            Attr::group("", [Attr::int("inlined", 2)]),
            Attr::group("nested", [Attr::bool("b", true)]),
            Attr::group("dropped", Vec::<Attr>::new()),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"a":"x","inlined":2,"nested":{"b":true}}"#);
    }

    #[test]
    fn converts_json_values() {
        let value = Value::from(serde_json::json!({ "tenant": "acme", "shard": 3 }));
        match value {
            Value::Group(attrs) => {
                assert_eq!(attrs.len(), 2);
                assert!(attrs.contains(&Attr::int("shard", 3)));
                assert!(attrs.contains(&Attr::string("tenant", "acme")));
            }
            other => panic!("expected group, got {other:?}"),
        }
        assert_eq!(Value::from(serde_json::json!(u64::MAX)), Value::Uint(u64::MAX));
    }

    #[test]
    fn display_renders_groups() {
        let value = Value::Group(vec![Attr::int("a", 1), Attr::string("b", "two")]);
        assert_eq!(value.to_string(), "[a=1 b=two]");
    }
}
