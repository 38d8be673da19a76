#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// The schema tables and the converter cache are guarded by `std::sync::RwLock`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod data;
mod error;
mod hash;

pub mod compile;
pub mod format;
pub mod record;
pub mod schema;
pub mod types;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use compile::CompiledConverter;
pub use data::{Data, EnumValue};
pub use error::{MissingField, SerialError, SerialResult, UnserializableField};
pub use format::Format;
pub use record::{BaseRecord, Capabilities, Record, RecordBuilder, RecordClass};
pub use schema::{CustomCodec, EnumDecl, FieldDecl, RecordDecl, Schema};
pub use types::{ResolveError, ScalarKind, TypeDescriptor, TypeExpr};
pub use value::{Map, Value};
