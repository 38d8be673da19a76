use alloc::string::String;

use super::{Format, codec_error};
use crate::error::SerialResult;
use crate::record::Capabilities;
use crate::value::Value;

/// JSON through `serde_json`.
///
/// Bytes are written as arrays of integers.
///
/// # Examples
///
/// ```
/// use vc_serial::Value;
/// use vc_serial::format::{Format, JsonFormat};
///
/// let value = Value::map([("name", Value::from("vc")), ("tags", Value::seq([]))]);
/// let text = JsonFormat::encode(&value).unwrap();
///
/// assert_eq!(text, r#"{"name":"vc","tags":[]}"#);
/// assert_eq!(JsonFormat::decode(&text).unwrap(), value);
/// ```
pub struct JsonFormat;

impl Format for JsonFormat {
    const NAME: &'static str = "json";
    const CAPABILITY: Capabilities = Capabilities::JSON;

    type Encoded = String;
    type Raw = str;

    fn encode(value: &Value) -> SerialResult<String> {
        serde_json::to_string(value).map_err(|err| codec_error(Self::NAME, err))
    }

    fn decode(raw: &str) -> SerialResult<Value> {
        serde_json::from_str(raw).map_err(|err| codec_error(Self::NAME, err))
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFormat;
    use crate::error::SerialError;
    use crate::format::Format;
    use crate::value::Value;

    #[test]
    fn keeps_key_order() {
        let value = JsonFormat::decode(r#"{"b": 1, "a": [true, null, 1.5]}"#).unwrap();
        let keys: alloc::vec::Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(
            value.get("a"),
            Some(&Value::seq([Value::Bool(true), Value::Null, Value::Float(1.5)]))
        );
    }

    #[test]
    fn malformed_input() {
        let err = JsonFormat::decode("{").unwrap_err();
        assert!(matches!(err, SerialError::Codec { format: "json", .. }));
    }
}
