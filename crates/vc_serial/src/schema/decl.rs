use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::codec::{PackHook, UnpackHook};
use crate::data::Data;
use crate::record::Capabilities;
use crate::types::TypeExpr;
use crate::value::Value;

// -----------------------------------------------------------------------------
// FieldDecl

/// One declared field of a record.
///
/// # Examples
///
/// ```
/// use vc_serial::{FieldDecl, TypeExpr};
///
/// let field = FieldDecl::new("created_at", TypeExpr::int())
///     .alias("createdAt")
///     .default(0)
///     .omit_if_default();
/// # let _ = field;
/// ```
#[derive(Clone)]
pub struct FieldDecl {
    pub(crate) name: String,
    pub(crate) ty: TypeExpr,
    pub(crate) default: Option<Data>,
    pub(crate) alias: Option<String>,
    pub(crate) omit_if_default: bool,
    pub(crate) pack: Option<PackHook>,
    pub(crate) unpack: Option<UnpackHook>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            alias: None,
            omit_if_default: false,
            pack: None,
            unpack: None,
        }
    }

    /// Value used when the field is absent from the input.
    pub fn default(mut self, value: impl Into<Data>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Key of the field in plain data, the field name if unset.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Skips the field on pack when it holds its default value.
    pub fn omit_if_default(mut self) -> Self {
        self.omit_if_default = true;
        self
    }

    /// Replaces the type-driven pack of this field.
    pub fn pack_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Data) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.pack = Some(Arc::new(hook));
        self
    }

    /// Replaces the type-driven unpack of this field.
    pub fn unpack_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value) -> Result<Data, String> + Send + Sync + 'static,
    {
        self.unpack = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("default", &self.default)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// RecordDecl

/// The declaration of a record type, registered with [`Schema::declare`].
///
/// Bases are given as type expressions so that a generic base can be
/// extended with concrete (or the record's own) type arguments.
///
/// # Examples
///
/// ```
/// use vc_serial::{Capabilities, FieldDecl, RecordDecl, Schema, TypeExpr};
///
/// let schema = Schema::new();
/// schema
///     .declare(RecordDecl::new("app::A").field(FieldDecl::new("x", TypeExpr::int())))
///     .unwrap();
/// let spec = schema
///     .declare(
///         RecordDecl::new("app::B")
///             .extends(TypeExpr::named("app::A"))
///             .field(FieldDecl::new("y", TypeExpr::int()))
///             .capability(Capabilities::MSGPACK),
///     )
///     .unwrap();
///
/// let names: Vec<_> = spec.fields().iter().map(|f| f.name()).collect();
/// assert_eq!(names, ["x", "y"]);
/// ```
///
/// [`Schema::declare`]: crate::Schema::declare
#[derive(Clone, Debug)]
pub struct RecordDecl {
    pub(crate) path: String,
    pub(crate) type_params: Vec<String>,
    pub(crate) bases: Vec<TypeExpr>,
    pub(crate) fields: Vec<FieldDecl>,
    pub(crate) capabilities: Capabilities,
    pub(crate) fixed_attributes: bool,
    pub(crate) omit_none: bool,
    pub(crate) forbid_extra_keys: bool,
    pub(crate) eager: bool,
}

impl RecordDecl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            type_params: Vec::new(),
            bases: Vec::new(),
            fields: Vec::new(),
            capabilities: Capabilities::empty(),
            fixed_attributes: false,
            omit_none: false,
            forbid_extra_keys: false,
            eager: false,
        }
    }

    /// Adds a type parameter, making the record generic.
    pub fn type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// Adds a base record. Bases are merged left to right.
    pub fn extends(mut self, base: TypeExpr) -> Self {
        self.bases.push(base);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Opts into plain-data conversion or a wire format.
    pub fn capability(mut self, capability: Capabilities) -> Self {
        self.capabilities |= capability;
        self
    }

    /// Rejects attributes outside the declared fields.
    pub fn fixed_attributes(mut self) -> Self {
        self.fixed_attributes = true;
        self
    }

    /// Skips fields holding none on pack.
    pub fn omit_none(mut self) -> Self {
        self.omit_none = true;
        self
    }

    /// Fails unpack when the input has keys no field reads.
    pub fn forbid_extra_keys(mut self) -> Self {
        self.forbid_extra_keys = true;
        self
    }

    /// Compiles the converter at declaration instead of first use.
    ///
    /// Ignored by generic records, which are compiled per instantiation.
    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }
}

// -----------------------------------------------------------------------------
// EnumDecl

/// The declaration of an enumeration.
///
/// # Examples
///
/// ```
/// use vc_serial::{EnumDecl, Schema};
///
/// let schema = Schema::new();
/// let color = schema
///     .declare_enum(EnumDecl::new("app::Color").member("Red", "red").member("Blue", "blue"))
///     .unwrap();
///
/// assert_eq!(color.members().collect::<Vec<_>>(), ["Red", "Blue"]);
/// ```
#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub(crate) path: String,
    pub(crate) members: Vec<(String, Value)>,
}

impl EnumDecl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            members: Vec::new(),
        }
    }

    /// Adds a member with its plain value, a string or an integer.
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.push((name.into(), value.into()));
        self
    }
}
