//! Type expressions, their descriptors and the resolver between them.
//!
//! ## Menu
//!
//! - [`TypeExpr`]: A declared field type, e.g. `schema::List<int>` or a type parameter `T`.
//!     - [`canonical_name`](TypeExpr::canonical_name): The diagnostic name, `schema::List<int>`.
//!     - [`type_ident`](TypeExpr::type_ident): Last path segment without arguments, `List`.
//!     - [`module_path`](TypeExpr::module_path): Optional module path, `schema`.
//!
//! - [`TypeDescriptor`]: The canonical shape a type expression resolves to:
//!     - `Scalar`, `Optional`, `Union`, `Sequence`, `Mapping`, `Tuple`,
//!     - `Enum`, `NestedRecord`, `Generic`, `Custom`,
//!     - `Param`, a placeholder only seen inside generic record declarations.
//!
//! - [`ScalarKind`]: `none`, `bool`, `int`, `float`, `str` and `bytes`.
//!
//! - [`ResolveError`]: A type expression with no descriptor, and why.
//!
//! Built-in types live in the [`SCHEMA_MODULE`] namespace.
//! Everything else is a record, an enum or a type with a registered custom codec.

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod expr;
mod parse;
mod resolve;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use resolve::Resolver;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::{ScalarKind, TypeDescriptor};
pub use expr::{SCHEMA_MODULE, TypeExpr};
pub use parse::ParseTypeError;
pub use resolve::ResolveError;
