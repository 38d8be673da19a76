use crate::value::Value;

/// The zero-field base form of a convertible record.
///
/// Used directly, not as the base of a declared record, its conversions
/// are no-ops that produce and accept the absence of a value. A declared
/// record without fields is different: it packs to an empty map.
///
/// # Examples
///
/// ```
/// use vc_serial::{BaseRecord, Value};
///
/// assert_eq!(BaseRecord.to_plain(), None);
/// assert_eq!(BaseRecord::from_plain(&Value::map::<&str, _>([])), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BaseRecord;

impl BaseRecord {
    #[inline]
    pub fn to_plain(&self) -> Option<Value> {
        None
    }

    #[inline]
    pub fn from_plain(_value: &Value) -> Option<BaseRecord> {
        None
    }
}
