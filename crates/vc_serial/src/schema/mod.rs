//! Declarations, their finalized specs and the schema that owns them.
//!
//! ## Menu
//!
//! - [`Schema`]: The registry of declared types and compiled converters.
//! - Declarations:
//!     - [`RecordDecl`]: Path, type parameters, bases, fields and record options.
//!     - [`FieldDecl`]: Name, type, default, alias and per-field hooks.
//!     - [`EnumDecl`]: Path and members with their plain values.
//!     - [`CustomCodec`]: Conversion functions for one exact type.
//! - Finalized specs:
//!     - [`RecordSpec`]: Merged fields, ancestors and capabilities of a record.
//!     - [`FieldSpec`]: A field with its resolved [`TypeDescriptor`].
//!     - [`EnumType`]: A declared enumeration.
//!
//! ## Inheritance
//!
//! A record lists its bases as type expressions. Bases are merged left to
//! right: inherited fields keep the position of their first occurrence,
//! and when two bases bring the same field the leftmost one is kept.
//! The record's own fields then replace inherited fields in place, or are
//! appended in declaration order. Capabilities are inherited, the
//! fixed-attribute flag and record options are not.
//!
//! [`TypeDescriptor`]: crate::TypeDescriptor

// -----------------------------------------------------------------------------
// Modules

mod build;
mod codec;
mod decl;
mod enums;
mod merge;
mod registry;
mod spec;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use enums::key_of;
pub(crate) use registry::Tables;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{CustomCodec, PackHook, UnpackHook};
pub use decl::{EnumDecl, FieldDecl, RecordDecl};
pub use enums::EnumType;
pub use registry::Schema;
pub use spec::{FieldSpec, RecordSpec};
