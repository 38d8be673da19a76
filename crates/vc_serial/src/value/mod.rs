//! Plain-data values, the common currency between records and wire formats.
//!
//! A [`Value`] is a finite tree of scalars, ordered sequences and
//! string-keyed maps. Compiled converters produce it from records and
//! consume it when reconstructing them; format adapters only ever
//! see this tree, never the records behind it.

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Value

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// An insertion-ordered string map of plain-data values.
pub type Map = indexmap::IndexMap<String, Value>;

/// A plain-data value.
///
/// Maps keep insertion order, so packing the same record twice
/// always yields the same key sequence, which order-sensitive
/// formats (MessagePack bytes, YAML documents) rely on.
///
/// # Examples
///
/// ```
/// use vc_serial::Value;
///
/// let value = Value::map([("x", Value::Int(1)), ("y", Value::Int(2))]);
///
/// assert_eq!(value.get("x"), Some(&Value::Int(1)));
/// assert_eq!(value.kind_name(), "map");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Map(Map),
}

impl Value {
    /// Builds a map value from key/value pairs, keeping their order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a sequence value.
    pub fn seq<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::Seq(items.into_iter().collect())
    }

    /// A short name of the value's shape, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a map.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Debug::fmt(v, f),
            Self::Str(v) => fmt::Debug::fmt(v, f),
            Self::Bytes(v) => write!(f, "b{v:?}"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (index, (key, item)) in map.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! impl_from {
    ($ty:ty => $variant:ident) => {
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value.into())
            }
        }
    };
}

impl_from!(bool => Bool);
impl_from!(i32 => Int);
impl_from!(i64 => Int);
impl_from!(u32 => Int);
impl_from!(f64 => Float);
impl_from!(String => Str);
impl_from!(&str => Str);
impl_from!(Vec<u8> => Bytes);
impl_from!(Map => Map);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Value;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn map_keeps_insertion_order() {
        let value = Value::map([("b", Value::Int(1)), ("a", Value::Int(2))]);
        let keys: vec::Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn display() {
        let value = Value::map([
            ("x", Value::Int(1)),
            ("tags", Value::seq([Value::from("a"), Value::Null])),
        ]);
        assert_eq!(value.to_string(), r#"{"x": 1, "tags": ["a", null]}"#);
    }
}
