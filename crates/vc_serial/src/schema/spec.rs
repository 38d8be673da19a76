use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::codec::{PackHook, UnpackHook};
use crate::data::Data;
use crate::record::Capabilities;
use crate::types::{TypeDescriptor, TypeExpr};

// -----------------------------------------------------------------------------
// FieldSpec

/// A finalized field: declared type, descriptor, default and overrides.
#[derive(Clone)]
pub struct FieldSpec {
    pub(crate) name: Arc<str>,
    pub(crate) ty: TypeExpr,
    pub(crate) descriptor: TypeDescriptor,
    pub(crate) default: Option<Data>,
    pub(crate) alias: Arc<str>,
    pub(crate) omit_if_default: bool,
    pub(crate) pack: Option<PackHook>,
    pub(crate) unpack: Option<UnpackHook>,
    pub(crate) origin: Arc<str>,
}

impl FieldSpec {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type, with base type arguments substituted.
    #[inline]
    pub fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn default(&self) -> Option<&Data> {
        self.default.as_ref()
    }

    /// Returns the key of the field in plain data.
    #[inline]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    #[inline]
    pub fn omit_if_default(&self) -> bool {
        self.omit_if_default
    }

    #[inline]
    pub fn has_pack_hook(&self) -> bool {
        self.pack.is_some()
    }

    #[inline]
    pub fn has_unpack_hook(&self) -> bool {
        self.unpack.is_some()
    }

    /// Returns the path of the record that declared this field.
    #[inline]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("alias", &self.alias)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// RecordSpec

/// The finalized, immutable description of a declared record.
///
/// Field order is the merge order: inherited fields first, in the order
/// their bases declared them, then fields the record introduces.
#[derive(Debug)]
pub struct RecordSpec {
    pub(crate) path: Arc<str>,
    pub(crate) type_params: Vec<Arc<str>>,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) ancestors: Vec<Arc<str>>,
    pub(crate) capabilities: Capabilities,
    pub(crate) fixed_attributes: bool,
    pub(crate) omit_none: bool,
    pub(crate) forbid_extra_keys: bool,
    pub(crate) eager: bool,
}

impl RecordSpec {
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the record type with its own parameters as arguments.
    pub fn ty(&self) -> TypeExpr {
        TypeExpr::generic(
            &self.path,
            self.type_params.iter().map(|p| TypeExpr::Param(p.clone())),
        )
    }

    #[inline]
    pub fn type_params(&self) -> &[Arc<str>] {
        &self.type_params
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }

    /// Returns the base paths, depth-first and left to right, without repeats.
    #[inline]
    pub fn ancestors(&self) -> &[Arc<str>] {
        &self.ancestors
    }

    /// Returns the capabilities, including those inherited from bases.
    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed_attributes
    }

    #[inline]
    pub fn omit_none(&self) -> bool {
        self.omit_none
    }

    #[inline]
    pub fn forbid_extra_keys(&self) -> bool {
        self.forbid_extra_keys
    }

    #[inline]
    pub fn is_eager(&self) -> bool {
        self.eager
    }
}
