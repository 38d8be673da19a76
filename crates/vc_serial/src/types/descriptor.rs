use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::expr::{self, TypeExpr};
use crate::schema::{CustomCodec, EnumType, RecordSpec};

// -----------------------------------------------------------------------------
// ScalarKind

/// The primitive kinds a scalar field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
}

impl ScalarKind {
    /// Returns the bare type name, e.g. `int`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
        }
    }

    /// Returns the `schema` type expression of this kind.
    pub fn type_expr(self) -> TypeExpr {
        TypeExpr::named(self.path())
    }

    const fn path(self) -> &'static str {
        match self {
            Self::None => expr::NONE,
            Self::Bool => expr::BOOL,
            Self::Int => expr::INT,
            Self::Float => expr::FLOAT,
            Self::Str => expr::STR,
            Self::Bytes => expr::BYTES,
        }
    }

    pub(crate) fn from_path(path: &str) -> Option<Self> {
        match path {
            expr::NONE => Some(Self::None),
            expr::BOOL => Some(Self::Bool),
            expr::INT => Some(Self::Int),
            expr::FLOAT => Some(Self::Float),
            expr::STR => Some(Self::Str),
            expr::BYTES => Some(Self::Bytes),
            _ => None,
        }
    }

    /// Whether values of this kind have a string form usable as a map key.
    pub const fn is_key(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float | Self::Str)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The canonical shape of a resolved type expression.
///
/// Descriptors hold shared links to the declarations they refer to,
/// so the compiler never looks a name up again once a field is resolved.
///
/// `Param` only appears in the field specs of generic records. The
/// compiler substitutes concrete arguments and resolves again before
/// any plan is built, so converters never see it.
///
/// # Examples
///
/// ```
/// use vc_serial::{Schema, ScalarKind, TypeDescriptor, TypeExpr};
///
/// let schema = Schema::new();
/// let descriptor = schema
///     .resolve(&TypeExpr::optional(TypeExpr::list(TypeExpr::int())))
///     .unwrap();
///
/// let TypeDescriptor::Optional(inner) = &descriptor else { unreachable!() };
/// let TypeDescriptor::Sequence(item) = &**inner else { unreachable!() };
/// assert!(matches!(**item, TypeDescriptor::Scalar(ScalarKind::Int)));
///
/// assert_eq!(descriptor.type_expr().to_string(), "schema.Optional[schema.List[int]]");
/// ```
#[derive(Clone)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Optional(Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    Sequence(Box<TypeDescriptor>),
    Mapping(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    Enum(Arc<EnumType>),
    NestedRecord(Arc<RecordSpec>),
    Generic(Arc<RecordSpec>, Vec<TypeExpr>),
    Custom(Arc<CustomCodec>),
    Param(Arc<str>),
}

impl TypeDescriptor {
    /// Returns the variant name, used in diagnostics.
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "Scalar",
            Self::Optional(_) => "Optional",
            Self::Union(_) => "Union",
            Self::Sequence(_) => "Sequence",
            Self::Mapping(..) => "Mapping",
            Self::Tuple(_) => "Tuple",
            Self::Enum(_) => "Enum",
            Self::NestedRecord(_) => "NestedRecord",
            Self::Generic(..) => "Generic",
            Self::Custom(_) => "Custom",
            Self::Param(_) => "Param",
        }
    }

    /// Rebuilds the canonical type expression this descriptor stands for.
    pub fn type_expr(&self) -> TypeExpr {
        fn all(items: &[TypeDescriptor]) -> impl Iterator<Item = TypeExpr> + '_ {
            items.iter().map(TypeDescriptor::type_expr)
        }

        match self {
            Self::Scalar(kind) => kind.type_expr(),
            Self::Optional(inner) => TypeExpr::optional(inner.type_expr()),
            Self::Union(items) => TypeExpr::union(all(items)),
            Self::Sequence(item) => TypeExpr::list(item.type_expr()),
            Self::Mapping(key, value) => TypeExpr::dict(key.type_expr(), value.type_expr()),
            Self::Tuple(items) => TypeExpr::tuple(all(items)),
            Self::Enum(enum_type) => TypeExpr::named(enum_type.path()),
            Self::NestedRecord(spec) => TypeExpr::named(spec.path()),
            Self::Generic(spec, args) => TypeExpr::generic(spec.path(), args.iter().cloned()),
            Self::Custom(codec) => codec.ty().clone(),
            Self::Param(name) => TypeExpr::Param(name.clone()),
        }
    }

    /// Whether the plain-data form of this type can serve as a map key.
    pub fn is_mapping_key(&self) -> bool {
        match self {
            Self::Scalar(kind) => kind.is_key(),
            Self::Enum(_) => true,
            _ => false,
        }
    }
}

/// Descriptors compare by the type expression they stand for.
impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_expr() == other.type_expr()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.variant_name(), self.type_expr())
    }
}
