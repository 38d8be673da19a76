use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::capability::Capabilities;
use super::class::RecordClass;
use crate::data::Data;
use crate::error::{SerialError, SerialResult};
use crate::format::Format;
use crate::value::Value;

/// An instance of a declared record.
///
/// Holds one value per declared field, in field order. Records without
/// fixed attributes also accept extra attributes, which are kept on the
/// instance but never serialized and never compared.
#[derive(Clone)]
pub struct Record {
    class: RecordClass,
    values: Vec<Data>,
    extra: Vec<(String, Data)>,
}

impl Record {
    /// `values` must hold one value per field of `class`.
    #[inline]
    pub(crate) fn from_parts(class: RecordClass, values: Vec<Data>) -> Self {
        Self {
            class,
            values,
            extra: Vec::new(),
        }
    }

    #[inline]
    pub fn class(&self) -> &RecordClass {
        &self.class
    }

    /// Returns the field values in field order.
    #[inline]
    pub fn values(&self) -> &[Data] {
        &self.values
    }

    #[inline]
    pub fn into_values(self) -> Vec<Data> {
        self.values
    }

    /// Returns a field, or an extra attribute, by name.
    pub fn get(&self, name: &str) -> Option<&Data> {
        match self.class.converter().field_index(name) {
            Some(index) => self.values.get(index),
            None => self
                .extra
                .iter()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value),
        }
    }

    /// Assigns a field, or an extra attribute on a non-fixed record.
    ///
    /// # Errors
    ///
    /// [`SerialError::NoAttribute`] if `name` is not a field and the
    /// record has fixed attributes.
    pub fn set(&mut self, name: &str, value: impl Into<Data>) -> SerialResult<()> {
        let value = value.into();
        let converter = self.class.converter();
        if let Some(index) = converter.field_index(name) {
            self.values[index] = converter.normalize(index, value);
            return Ok(());
        }
        if self.class.is_fixed() {
            return Err(self.class.no_attribute(name));
        }
        match self.extra.iter_mut().find(|(attr, _)| attr == name) {
            Some((_, slot)) => *slot = value,
            None => self.extra.push((String::from(name), value)),
        }
        Ok(())
    }

    /// Iterates the extra attributes, in assignment order.
    pub fn extra_attributes(&self) -> impl Iterator<Item = (&str, &Data)> {
        self.extra.iter().map(|(name, value)| (name.as_str(), value))
    }

    // -------------------------------------------------------------------------
    // Conversion

    /// Packs the instance into plain data through the compiled converter.
    ///
    /// This needs no capability; nested records are always packed this way.
    #[inline]
    pub fn pack(&self) -> SerialResult<Value> {
        self.class.converter().pack(&self.values)
    }

    /// Packs the instance, for records with plain-data conversion.
    pub fn to_plain(&self) -> SerialResult<Value> {
        if !self.class.capabilities().supports(Capabilities::PLAIN) {
            return Err(SerialError::Unsupported {
                record: self.class.ty().clone(),
                format: "plain",
            });
        }
        self.pack()
    }

    /// Packs the instance and encodes it with the format `F`.
    pub fn encode<F: Format>(&self) -> SerialResult<F::Encoded> {
        if !self.class.capabilities().supports(F::CAPABILITY) {
            return Err(SerialError::Unsupported {
                record: self.class.ty().clone(),
                format: F::NAME,
            });
        }
        F::encode(&self.pack()?)
    }

    #[cfg(feature = "json")]
    #[inline]
    pub fn to_json(&self) -> SerialResult<String> {
        self.encode::<crate::format::JsonFormat>()
    }

    #[cfg(feature = "msgpack")]
    #[inline]
    pub fn to_msgpack(&self) -> SerialResult<Vec<u8>> {
        self.encode::<crate::format::MsgPackFormat>()
    }

    #[cfg(feature = "yaml")]
    #[inline]
    pub fn to_yaml(&self) -> SerialResult<String> {
        self.encode::<crate::format::YamlFormat>()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.class.name();
        let mut out = f.debug_struct(&name);
        for (field, value) in self.class.field_names().zip(&self.values) {
            out.field(field, value);
        }
        out.finish()
    }
}
