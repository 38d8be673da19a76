use alloc::vec::Vec;

use super::{Format, codec_error};
use crate::error::SerialResult;
use crate::record::Capabilities;
use crate::value::Value;

/// MessagePack through `rmp-serde`.
///
/// Integers take their most compact encoding, maps keep string keys in
/// insertion order and bytes use the `bin` family, so equal values
/// always encode to equal bytes.
///
/// # Examples
///
/// ```
/// use vc_serial::Value;
/// use vc_serial::format::{Format, MsgPackFormat};
///
/// let value = Value::map([("x", Value::Int(1))]);
/// let bytes = MsgPackFormat::encode(&value).unwrap();
///
/// assert_eq!(bytes, [0x81, 0xa1, b'x', 0x01]);
/// assert_eq!(MsgPackFormat::decode(&bytes).unwrap(), value);
/// ```
pub struct MsgPackFormat;

impl Format for MsgPackFormat {
    const NAME: &'static str = "msgpack";
    const CAPABILITY: Capabilities = Capabilities::MSGPACK;

    type Encoded = Vec<u8>;
    type Raw = [u8];

    fn encode(value: &Value) -> SerialResult<Vec<u8>> {
        rmp_serde::to_vec(value).map_err(|err| codec_error(Self::NAME, err))
    }

    fn decode(raw: &[u8]) -> SerialResult<Value> {
        rmp_serde::from_slice(raw).map_err(|err| codec_error(Self::NAME, err))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::MsgPackFormat;
    use crate::format::Format;
    use crate::value::Value;

    #[test]
    fn binary_and_negative_values() {
        let value = Value::map([
            ("data", Value::Bytes(vec![0, 1, 2])),
            ("n", Value::Int(-1)),
            ("big", Value::Int(70000)),
        ]);
        let bytes = MsgPackFormat::encode(&value).unwrap();

        assert_eq!(&bytes[..9], [0x83, 0xa4, b'd', b'a', b't', b'a', 0xc4, 0x03, 0x00]);
        assert_eq!(MsgPackFormat::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn truncated_input() {
        assert!(MsgPackFormat::decode(&[0x82, 0xa1]).is_err());
    }
}
