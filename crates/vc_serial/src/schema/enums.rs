use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::data::EnumValue;
use crate::types::TypeExpr;
use crate::value::Value;

/// A declared enumeration: ordered members, each with a plain value.
///
/// Member values are strings or integers and are unique within the enum.
#[derive(Debug)]
pub struct EnumType {
    path: Arc<str>,
    members: Vec<(Arc<str>, Value)>,
}

impl EnumType {
    pub(crate) fn new(path: Arc<str>, members: Vec<(Arc<str>, Value)>) -> Self {
        Self { path, members }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn ty(&self) -> TypeExpr {
        TypeExpr::named(&self.path)
    }

    /// Iterates the member names in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| &**name)
    }

    /// Returns the enum value of the member called `name`.
    pub fn member(&self, name: &str) -> Option<EnumValue> {
        self.members
            .iter()
            .find(|(member, _)| &**member == name)
            .map(|(member, _)| EnumValue::from_parts(self.path.clone(), member.clone()))
    }

    /// Returns the plain value of `value`, if it is a member of this enum.
    pub fn plain_value(&self, value: &EnumValue) -> Option<&Value> {
        if value.path() != &*self.path {
            return None;
        }
        self.members
            .iter()
            .find(|(member, _)| &**member == value.member())
            .map(|(_, plain)| plain)
    }

    /// Returns the member whose plain value is `plain`.
    pub fn from_plain(&self, plain: &Value) -> Option<EnumValue> {
        self.members
            .iter()
            .find(|(_, value)| value == plain)
            .map(|(member, _)| EnumValue::from_parts(self.path.clone(), member.clone()))
    }

    /// Returns the member whose plain value renders as the map key `key`.
    pub(crate) fn from_key(&self, key: &str) -> Option<EnumValue> {
        self.members
            .iter()
            .find(|(_, value)| key_of(value).as_deref() == Some(key))
            .map(|(member, _)| EnumValue::from_parts(self.path.clone(), member.clone()))
    }
}

/// The map key form of a member value.
pub(crate) fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        _ => None,
    }
}
