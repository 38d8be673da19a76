use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::capability::Capabilities;
use super::instance::Record;
use crate::compile::CompiledConverter;
use crate::data::Data;
use crate::error::{SerialError, SerialResult};
use crate::format::Format;
use crate::schema::RecordSpec;
use crate::types::TypeExpr;
use crate::value::Value;

// -----------------------------------------------------------------------------
// RecordClass

/// A handle to a compiled record type.
///
/// Cloning is cheap; every clone shares the same [`CompiledConverter`].
/// Two classes are equal when they stand for the same record type with
/// the same generic arguments.
#[derive(Clone)]
pub struct RecordClass {
    converter: Arc<CompiledConverter>,
}

impl RecordClass {
    #[inline]
    pub(crate) fn new(converter: Arc<CompiledConverter>) -> Self {
        Self { converter }
    }

    /// Returns the record type, e.g. `app.Pair[int]`.
    #[inline]
    pub fn ty(&self) -> &TypeExpr {
        self.converter.ty()
    }

    /// Returns the canonical name of the record type.
    #[inline]
    pub fn name(&self) -> String {
        self.converter.ty().canonical_name()
    }

    #[inline]
    pub fn spec(&self) -> &Arc<RecordSpec> {
        self.converter.spec()
    }

    #[inline]
    pub fn converter(&self) -> &Arc<CompiledConverter> {
        &self.converter
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.spec().capabilities()
    }

    /// Whether instances reject attributes outside the declared fields.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.spec().is_fixed()
    }

    #[inline]
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.converter.field_names()
    }

    pub(crate) fn no_attribute(&self, attribute: &str) -> SerialError {
        SerialError::NoAttribute {
            record: self.ty().clone(),
            attribute: String::from(attribute),
        }
    }

    fn require(&self, required: Capabilities, format: &'static str) -> SerialResult<()> {
        if self.capabilities().supports(required) {
            Ok(())
        } else {
            Err(SerialError::Unsupported {
                record: self.ty().clone(),
                format,
            })
        }
    }

    // -------------------------------------------------------------------------
    // Construction

    /// Starts building an instance field by field.
    pub fn builder(&self) -> RecordBuilder {
        RecordBuilder {
            class: self.clone(),
            slots: (0..self.converter.len()).map(|_| None).collect(),
            error: None,
        }
    }

    /// Builds an instance from named field values.
    ///
    /// Absent fields take their default.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NoAttribute`]: a name is not a field.
    /// - [`SerialError::MissingField`]: a field without default is absent.
    pub fn construct<'a, I>(&self, values: I) -> SerialResult<Record>
    where
        I: IntoIterator<Item = (&'a str, Data)>,
    {
        values
            .into_iter()
            .fold(self.builder(), |builder, (name, value)| builder.with(name, value))
            .build()
    }

    /// Builds an instance from field values in field order.
    ///
    /// Trailing fields may be left out when they have defaults.
    pub fn from_values(&self, values: Vec<Data>) -> SerialResult<Record> {
        let len = self.converter.len();
        if values.len() > len {
            return Err(self.no_attribute(&alloc::format!("#{len}")));
        }
        let mut slots: Vec<Option<Data>> = values.into_iter().map(Some).collect();
        slots.resize(len, None);
        let values = self.converter.fill(slots)?;
        Ok(Record::from_parts(self.clone(), values))
    }

    // -------------------------------------------------------------------------
    // Conversion

    /// Reconstructs an instance from plain data.
    ///
    /// This is the compiled unpack itself and needs no capability.
    pub fn unpack(&self, value: &Value) -> SerialResult<Record> {
        let values = self.converter.unpack(value)?;
        Ok(Record::from_parts(self.clone(), values))
    }

    /// Reconstructs an instance from plain data, for records with the
    /// [`PLAIN`](Capabilities::PLAIN) capability or any format.
    pub fn from_plain(&self, value: &Value) -> SerialResult<Record> {
        self.require(Capabilities::PLAIN, "plain")?;
        self.unpack(value)
    }

    /// Decodes `raw` with the format `F` and reconstructs an instance.
    pub fn decode<F: Format>(&self, raw: &F::Raw) -> SerialResult<Record> {
        self.require(F::CAPABILITY, F::NAME)?;
        self.unpack(&F::decode(raw)?)
    }

    #[cfg(feature = "json")]
    #[inline]
    pub fn from_json(&self, text: &str) -> SerialResult<Record> {
        self.decode::<crate::format::JsonFormat>(text)
    }

    #[cfg(feature = "msgpack")]
    #[inline]
    pub fn from_msgpack(&self, bytes: &[u8]) -> SerialResult<Record> {
        self.decode::<crate::format::MsgPackFormat>(bytes)
    }

    #[cfg(feature = "yaml")]
    #[inline]
    pub fn from_yaml(&self, text: &str) -> SerialResult<Record> {
        self.decode::<crate::format::YamlFormat>(text)
    }
}

impl PartialEq for RecordClass {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.converter, &other.converter) || self.ty() == other.ty()
    }
}

impl Eq for RecordClass {}

impl fmt::Debug for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordClass").field(self.ty()).finish()
    }
}

// -----------------------------------------------------------------------------
// RecordBuilder

/// Collects field values for a new instance.
///
/// The first invalid name is reported by [`build`](RecordBuilder::build).
///
/// # Examples
///
/// ```
/// use vc_serial::{FieldDecl, RecordDecl, Schema, TypeExpr};
///
/// let schema = Schema::new();
/// schema
///     .declare(
///         RecordDecl::new("app::User")
///             .field(FieldDecl::new("name", TypeExpr::str()))
///             .field(FieldDecl::new("age", TypeExpr::int()).default(0)),
///     )
///     .unwrap();
///
/// let user = schema.class("app::User").unwrap().builder().with("name", "ada").build().unwrap();
/// assert_eq!(user.get("age").and_then(|age| age.as_int()), Some(0));
/// ```
pub struct RecordBuilder {
    class: RecordClass,
    slots: Vec<Option<Data>>,
    error: Option<SerialError>,
}

impl RecordBuilder {
    /// Sets the field `name`.
    pub fn with(mut self, name: &str, value: impl Into<Data>) -> Self {
        if self.error.is_none() {
            match self.class.converter.field_index(name) {
                Some(index) => self.slots[index] = Some(value.into()),
                None => self.error = Some(self.class.no_attribute(name)),
            }
        }
        self
    }

    /// Finishes the instance, filling absent fields with their defaults.
    pub fn build(self) -> SerialResult<Record> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let values = self.class.converter.fill(self.slots)?;
        Ok(Record::from_parts(self.class, values))
    }
}
