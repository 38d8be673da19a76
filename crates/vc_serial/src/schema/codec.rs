use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::data::Data;
use crate::types::TypeExpr;
use crate::value::Value;

/// A field-level pack override, from field data to plain data.
pub type PackHook = Arc<dyn Fn(&Data) -> Result<Value, String> + Send + Sync>;

/// A field-level unpack override, from plain data to field data.
pub type UnpackHook = Arc<dyn Fn(&Value) -> Result<Data, String> + Send + Sync>;

/// Conversion functions for a type the schema knows nothing else about.
///
/// A codec is registered for one exact type expression and is used by
/// every field declared with that type. Failures are plain reason strings,
/// reported as the reason of an `UnserializableField`.
///
/// # Examples
///
/// ```
/// use vc_serial::{CustomCodec, Data, Value, TypeExpr};
///
/// // Fixed-point decimals carried as strings.
/// let codec = CustomCodec::new(
///     TypeExpr::named("app::Decimal"),
///     |data| match data {
///         Data::Int(cents) => Ok(Value::from(format!("{}.{:02}", cents / 100, cents % 100))),
///         other => Err(format!("expected cents, found {}", other.kind_name())),
///     },
///     |value| {
///         let text = value.as_str().ok_or("expected a decimal string")?;
///         let (units, cents) = text.split_once('.').ok_or("missing decimal point")?;
///         let units: i64 = units.parse().map_err(|_| "bad units")?;
///         let cents: i64 = cents.parse().map_err(|_| "bad cents")?;
///         Ok(Data::Int(units * 100 + cents))
///     },
/// );
///
/// assert_eq!(codec.pack(&Data::Int(1250)), Ok(Value::from("12.50")));
/// assert_eq!(codec.unpack(&Value::from("3.07")), Ok(Data::Int(307)));
/// ```
#[derive(Clone)]
pub struct CustomCodec {
    ty: TypeExpr,
    pack: PackHook,
    unpack: UnpackHook,
}

impl CustomCodec {
    pub fn new<P, U>(ty: TypeExpr, pack: P, unpack: U) -> Self
    where
        P: Fn(&Data) -> Result<Value, String> + Send + Sync + 'static,
        U: Fn(&Value) -> Result<Data, String> + Send + Sync + 'static,
    {
        Self {
            ty,
            pack: Arc::new(pack),
            unpack: Arc::new(unpack),
        }
    }

    /// Returns the type this codec converts.
    #[inline]
    pub fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    #[inline]
    pub fn pack(&self, data: &Data) -> Result<Value, String> {
        (self.pack)(data)
    }

    #[inline]
    pub fn unpack(&self, value: &Value) -> Result<Data, String> {
        (self.unpack)(value)
    }
}

impl fmt::Debug for CustomCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCodec")
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}
