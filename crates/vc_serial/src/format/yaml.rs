use alloc::string::String;

use super::{Format, codec_error};
use crate::error::SerialResult;
use crate::record::Capabilities;
use crate::value::Value;

/// YAML through `serde_yml`.
///
/// YAML has no byte strings, so bytes are written as sequences of
/// integers. A `bytes` field reads them back from that form.
pub struct YamlFormat;

impl Format for YamlFormat {
    const NAME: &'static str = "yaml";
    const CAPABILITY: Capabilities = Capabilities::YAML;

    type Encoded = String;
    type Raw = str;

    fn encode(value: &Value) -> SerialResult<String> {
        serde_yml::to_string(&spell_bytes(value)).map_err(|err| codec_error(Self::NAME, err))
    }

    fn decode(raw: &str) -> SerialResult<Value> {
        serde_yml::from_str(raw).map_err(|err| codec_error(Self::NAME, err))
    }
}

fn spell_bytes(value: &Value) -> Value {
    match value {
        Value::Bytes(bytes) => Value::Seq(bytes.iter().map(|b| Value::Int(i64::from(*b))).collect()),
        Value::Seq(items) => Value::Seq(items.iter().map(spell_bytes).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), spell_bytes(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::YamlFormat;
    use crate::format::Format;
    use crate::value::Value;

    #[test]
    fn nested_documents() {
        let value = Value::map([
            ("name", Value::from("point")),
            ("coords", Value::map([("x", Value::Int(1)), ("y", Value::Float(2.5))])),
            ("tags", Value::seq([Value::from("a"), Value::from("10")])),
            ("note", Value::Null),
        ]);

        let text = YamlFormat::encode(&value).unwrap();
        assert_eq!(YamlFormat::decode(&text).unwrap(), value);
    }

    #[test]
    fn reads_handwritten_text() {
        let value = YamlFormat::decode("x: 1\ny: [true, false]\n").unwrap();
        assert_eq!(value.get("x"), Some(&Value::Int(1)));
        assert_eq!(
            value.get("y"),
            Some(&Value::seq([Value::Bool(true), Value::Bool(false)]))
        );
    }

    #[test]
    fn bytes_become_integer_lists() {
        let value = Value::map([
            ("blob", Value::Bytes(vec![0, 7, 255])),
            ("parts", Value::seq([Value::Bytes(vec![1])])),
        ]);

        let text = YamlFormat::encode(&value).unwrap();
        assert_eq!(
            YamlFormat::decode(&text).unwrap(),
            Value::map([
                ("blob", Value::seq([Value::Int(0), Value::Int(7), Value::Int(255)])),
                ("parts", Value::seq([Value::seq([Value::Int(1)])])),
            ])
        );
    }
}
