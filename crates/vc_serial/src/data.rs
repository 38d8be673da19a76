use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::record::Record;

// -----------------------------------------------------------------------------
// EnumValue

/// A member of a declared enumeration, named by enum path and member name.
///
/// The plain value of the member is looked up in the schema when the
/// value is packed, so an `EnumValue` can be built before the enum is declared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    path: Arc<str>,
    member: Arc<str>,
}

impl EnumValue {
    #[inline]
    pub fn new(path: &str, member: &str) -> Self {
        Self {
            path: Arc::from(path),
            member: Arc::from(member),
        }
    }

    #[inline]
    pub(crate) fn from_parts(path: Arc<str>, member: Arc<str>) -> Self {
        Self { path, member }
    }

    /// Returns the path of the enumeration.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the member name.
    #[inline]
    pub fn member(&self) -> &str {
        &self.member
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.path, self.member)
    }
}

// -----------------------------------------------------------------------------
// Data

/// The runtime value of a record field.
///
/// Unlike [`Value`](crate::Value), `Data` keeps the distinctions the
/// declared types make: tuples are not lists, map keys keep their
/// type, and enum members and nested records are values of their own.
///
/// # Examples
///
/// ```
/// use vc_serial::Data;
///
/// let data = Data::map([(Data::Int(1), Data::from("one"))]);
/// assert_eq!(data.kind_name(), "map");
///
/// assert_eq!(Data::from(Some(3)), Data::Int(3));
/// assert_eq!(Data::from(None::<i64>), Data::None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Data {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Data>),
    Tuple(Vec<Data>),
    Map(Vec<(Data, Data)>),
    Enum(EnumValue),
    Record(Box<Record>),
}

impl Data {
    pub fn list<I: IntoIterator<Item = Data>>(items: I) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn tuple<I: IntoIterator<Item = Data>>(items: I) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    pub fn map<I: IntoIterator<Item = (Data, Data)>>(entries: I) -> Self {
        Self::Map(entries.into_iter().collect())
    }

    /// A short name of the value's shape, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Enum(_) => "enum",
            Self::Record(_) => "record",
        }
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => |$v:ident| $expr:expr;)*) => {
        $(
            impl From<$ty> for Data {
                #[inline]
                fn from($v: $ty) -> Self {
                    $expr
                }
            }
        )*
    };
}

impl_from! {
    bool => |v| Data::Bool(v);
    i32 => |v| Data::Int(i64::from(v));
    i64 => |v| Data::Int(v);
    u32 => |v| Data::Int(i64::from(v));
    f64 => |v| Data::Float(v);
    String => |v| Data::Str(v);
    &str => |v| Data::Str(String::from(v));
    Vec<u8> => |v| Data::Bytes(v);
    EnumValue => |v| Data::Enum(v);
    Record => |v| Data::Record(Box::new(v));
}

impl<T: Into<Data>> From<Option<T>> for Data {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Data::None, Into::into)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Data, EnumValue};

    #[test]
    fn conversions() {
        assert_eq!(Data::from(7_i32), Data::Int(7));
        assert_eq!(Data::from("a"), Data::Str("a".into()));
        assert_eq!(Data::from(Some(1.5)), Data::Float(1.5));
        assert!(Data::from(None::<bool>).is_none());
        assert_eq!(Data::from(alloc::vec![1_u8, 2]).kind_name(), "bytes");
    }

    #[test]
    fn tuples_are_not_lists() {
        let list = Data::list([Data::Int(1), Data::Int(2)]);
        let tuple = Data::tuple([Data::Int(1), Data::Int(2)]);
        assert_ne!(list, tuple);
    }

    #[test]
    fn enum_values() {
        let red = EnumValue::new("app::Color", "Red");
        assert_eq!(red.path(), "app::Color");
        assert_eq!(red.member(), "Red");
        assert_eq!(alloc::format!("{red:?}"), "app::Color::Red");
        assert_ne!(Data::from(red), Data::from(EnumValue::new("app::Color", "Blue")));
    }
}
