use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::types::TypeExpr;

// -----------------------------------------------------------------------------
// Field errors

/// A required field is absent from the plain data and has no default.
///
/// # Examples
///
/// ```
/// use vc_serial::{MissingField, TypeExpr};
///
/// let err = MissingField::new("x", TypeExpr::int(), TypeExpr::named("app::Point"));
/// assert_eq!(
///     err.to_string(),
///     r#"Field "x" of type schema.int is missing in app.Point instance"#,
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Field \"{name}\" of type {field_type} is missing in {holder_type} instance")]
pub struct MissingField {
    pub name: String,
    pub field_type: TypeExpr,
    pub holder_type: TypeExpr,
}

impl MissingField {
    pub fn new(name: impl Into<String>, field_type: TypeExpr, holder_type: TypeExpr) -> Self {
        Self {
            name: name.into(),
            field_type,
            holder_type,
        }
    }

    /// Returns the canonical name of the field type, e.g. `schema.List[int]`.
    #[inline]
    pub fn field_type_name(&self) -> String {
        self.field_type.canonical_name()
    }

    /// Returns the canonical name of the record holding the field.
    #[inline]
    pub fn holder_type_name(&self) -> String {
        self.holder_type.canonical_name()
    }
}

/// A field type has no descriptor, or a field value could not be converted.
///
/// When the failure happened inside a nested record, `source` holds the
/// error of the nested record and `message` repeats its text.
#[derive(Debug, Error)]
#[error(
    "Field \"{name}\" of type {field_type} in {holder_type} is not serializable{}",
    Reason(.message)
)]
pub struct UnserializableField {
    pub name: String,
    pub field_type: TypeExpr,
    pub holder_type: TypeExpr,
    pub message: Option<String>,
    #[source]
    pub source: Option<Box<SerialError>>,
}

impl UnserializableField {
    pub fn new(name: impl Into<String>, field_type: TypeExpr, holder_type: TypeExpr) -> Self {
        Self {
            name: name.into(),
            field_type,
            holder_type,
            message: None,
            source: None,
        }
    }

    /// Attaches a reason, rendered after the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attributes a nested failure to this field.
    pub(crate) fn caused_by(mut self, inner: SerialError) -> Self {
        self.message = Some(alloc::format!("{inner}"));
        self.source = Some(Box::new(inner));
        self
    }

    /// Returns the canonical name of the field type.
    #[inline]
    pub fn field_type_name(&self) -> String {
        self.field_type.canonical_name()
    }

    /// Returns the canonical name of the record holding the field.
    #[inline]
    pub fn holder_type_name(&self) -> String {
        self.holder_type.canonical_name()
    }
}

/// Renders an optional reason as a `: reason` suffix.
pub(crate) struct Reason<'a>(pub &'a Option<String>);

impl fmt::Display for Reason<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(reason) => write!(f, ": {reason}"),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// SerialError

/// The error type of every schema, conversion and format operation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerialError {
    #[error(transparent)]
    MissingField(#[from] MissingField),

    #[error(transparent)]
    UnserializableField(#[from] UnserializableField),

    #[error("record `{record}` has no attribute `{attribute}`")]
    NoAttribute { record: TypeExpr, attribute: String },

    #[error("`{0}` is not a declared record")]
    UnknownRecord(TypeExpr),

    #[error("invalid declaration of `{path}`: {reason}")]
    InvalidDeclaration { path: String, reason: String },

    #[error("`{path}` expects {expected} type arguments, found {found}")]
    TypeArguments {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("{record} can only be unpacked from a map, found {found}")]
    ExpectedMapping {
        record: TypeExpr,
        found: &'static str,
    },

    #[error("unknown keys in {record} input: {}", .keys.join(", "))]
    ExtraKeys { record: TypeExpr, keys: Vec<String> },

    #[error("{record} does not support the {format} format")]
    Unsupported {
        record: TypeExpr,
        format: &'static str,
    },

    #[error("{format} codec failed: {message}")]
    Codec {
        format: &'static str,
        message: String,
    },
}

impl SerialError {
    #[inline]
    pub(crate) fn invalid(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            path: String::from(path),
            reason: reason.into(),
        }
    }

    /// Follows nested field failures back to the error that started them.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_serial::{MissingField, SerialError, TypeExpr, UnserializableField};
    ///
    /// let inner = SerialError::from(MissingField::new(
    ///     "x",
    ///     TypeExpr::int(),
    ///     TypeExpr::named("app::Inner"),
    /// ));
    /// let outer = SerialError::from(
    ///     UnserializableField::new("inner", TypeExpr::named("app::Inner"), TypeExpr::named("app::Outer"))
    ///         .with_message("unused"),
    /// );
    ///
    /// assert!(matches!(inner.innermost(), SerialError::MissingField(_)));
    /// assert!(matches!(outer.innermost(), SerialError::UnserializableField(_)));
    /// ```
    pub fn innermost(&self) -> &SerialError {
        let mut current = self;
        while let Self::UnserializableField(UnserializableField {
            source: Some(inner),
            ..
        }) = current
        {
            current = inner;
        }
        current
    }
}

pub type SerialResult<T> = Result<T, SerialError>;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::{MissingField, SerialError, UnserializableField};
    use crate::types::TypeExpr;

    #[test]
    fn field_messages() {
        let holder = TypeExpr::object();

        let missing = MissingField::new("x", TypeExpr::int(), holder.clone());
        assert_eq!(
            missing.to_string(),
            r#"Field "x" of type schema.int is missing in schema.object instance"#
        );

        let generic = MissingField::new("x", TypeExpr::list(TypeExpr::int()), holder.clone());
        assert_eq!(generic.field_type_name(), "schema.List[int]");
        assert_eq!(generic.holder_type_name(), "schema.object");

        let plain = UnserializableField::new("x", TypeExpr::object(), holder.clone());
        assert_eq!(
            plain.to_string(),
            r#"Field "x" of type schema.object in schema.object is not serializable"#
        );

        let reasoned = plain.with_message("test message");
        assert_eq!(
            reasoned.to_string(),
            r#"Field "x" of type schema.object in schema.object is not serializable: test message"#
        );
    }

    #[test]
    fn nested_chain() {
        use core::error::Error;

        let missing = MissingField::new("x", TypeExpr::int(), TypeExpr::named("app::Inner"));
        let middle = UnserializableField::new(
            "inner",
            TypeExpr::named("app::Inner"),
            TypeExpr::named("app::Middle"),
        )
        .caused_by(missing.clone().into());
        let outer = UnserializableField::new(
            "middle",
            TypeExpr::named("app::Middle"),
            TypeExpr::named("app::Outer"),
        )
        .caused_by(middle.into());

        let err = SerialError::from(outer);
        assert!(err.source().is_some());
        match err.innermost() {
            SerialError::MissingField(inner) => assert_eq!(*inner, missing),
            other => panic!("unexpected innermost error: {other}"),
        }
        assert!(err.to_string().ends_with(&missing.to_string()));
    }

    #[test]
    fn ambient_messages() {
        let err = SerialError::ExtraKeys {
            record: TypeExpr::named("app::Point"),
            keys: vec!["z".into(), "w".into()],
        };
        assert_eq!(err.to_string(), "unknown keys in app.Point input: z, w");

        let err = SerialError::NoAttribute {
            record: TypeExpr::named("app::Point"),
            attribute: "z".into(),
        };
        assert_eq!(err.to_string(), "record `app.Point` has no attribute `z`");
    }
}
