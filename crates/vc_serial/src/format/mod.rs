//! Wire-format adapters over plain data.
//!
//! ## Menu
//!
//! - [`Format`]: Encodes a [`Value`] to bytes or text and decodes it back.
//! - [`JsonFormat`]: Text format, feature `json`.
//! - [`MsgPackFormat`]: Binary map-oriented format, feature `msgpack`.
//! - [`YamlFormat`]: Human-readable structured text, feature `yaml`.
//!
//! Adapters only see plain data. A record encodes through its compiled
//! converter and the adapter, so a nested record never needs the format
//! capability of its holder.

use crate::error::SerialResult;
use crate::record::Capabilities;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "msgpack")]
mod msgpack;
#[cfg(feature = "yaml")]
mod yaml;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "json")]
pub use json::JsonFormat;
#[cfg(feature = "msgpack")]
pub use msgpack::MsgPackFormat;
#[cfg(feature = "yaml")]
pub use yaml::YamlFormat;

// -----------------------------------------------------------------------------
// Format

/// A wire format for plain data.
///
/// `CAPABILITY` is the flag a record must carry to use the format.
pub trait Format {
    /// Name used in diagnostics.
    const NAME: &'static str;
    const CAPABILITY: Capabilities;

    /// The encoded form, `String` or `Vec<u8>`.
    type Encoded;
    /// The borrowed form accepted by `decode`, `str` or `[u8]`.
    type Raw: ?Sized;

    fn encode(value: &Value) -> SerialResult<Self::Encoded>;

    fn decode(raw: &Self::Raw) -> SerialResult<Value>;
}

#[cfg(any(feature = "json", feature = "msgpack", feature = "yaml"))]
#[inline]
fn codec_error(format: &'static str, err: impl core::fmt::Display) -> crate::SerialError {
    crate::SerialError::Codec {
        format,
        message: alloc::format!("{err}"),
    }
}
