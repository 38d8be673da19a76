//! Compilation of record specs into converters.
//!
//! ## Menu
//!
//! - [`CompiledConverter`]: The pack and unpack routines of one record type.
//!
//! A converter is a list of field plans. A plan is built from a concrete
//! [`TypeDescriptor`] and mirrors its shape: scalars, optionals, unions
//! tried in declaration order, sequences, mappings with string-rendered
//! keys, tuples, enums, custom codecs, and nested records, which hold an
//! `Arc` to their own converter.
//!
//! Converters are cached by [`Schema`] under the record type with its
//! generic arguments, e.g. `app::Pair<int>`. Each distinct key is
//! compiled at most once per published converter.
//!
//! [`TypeDescriptor`]: crate::TypeDescriptor
//! [`Schema`]: crate::Schema

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod converter;
mod plan;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use cache::ConverterCache;

// -----------------------------------------------------------------------------
// Exports

pub use converter::CompiledConverter;
