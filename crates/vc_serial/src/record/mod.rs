//! Record classes and instances.
//!
//! ## Menu
//!
//! - [`RecordClass`]: A compiled record type; builds, unpacks and decodes instances.
//! - [`RecordBuilder`]: Field-by-field construction with defaults.
//! - [`Record`]: An instance; packs, encodes and guards its attribute set.
//! - [`Capabilities`]: Plain-data conversion and the wire formats a record opts into.
//! - [`BaseRecord`]: The zero-field base form, whose conversions produce nothing.
//!
//! `pack` and `unpack` are always available, they are what nested records
//! go through. `to_plain`, `encode` and their `from_*` counterparts check
//! the record's capabilities first.

// -----------------------------------------------------------------------------
// Modules

mod base;
mod capability;
mod class;
mod instance;

// -----------------------------------------------------------------------------
// Exports

pub use base::BaseRecord;
pub use capability::Capabilities;
pub use class::{RecordBuilder, RecordClass};
pub use instance::Record;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::{BaseRecord, Capabilities, RecordClass};
    use crate::data::Data;
    use crate::error::SerialError;
    use crate::schema::{FieldDecl, RecordDecl, Schema};
    use crate::types::TypeExpr;
    use crate::value::Value;

    const ALL: [Capabilities; 4] = [
        Capabilities::PLAIN,
        Capabilities::JSON,
        Capabilities::MSGPACK,
        Capabilities::YAML,
    ];

    /// Declares `A { x }` and `B(A) { y }`, both with `capability`.
    fn inherited(schema: &Schema, prefix: &str, capability: Capabilities) -> RecordClass {
        let base = format!("{prefix}::A");
        let derived = format!("{prefix}::B");
        schema
            .declare(
                RecordDecl::new(base.clone())
                    .field(FieldDecl::new("x", TypeExpr::int()))
                    .capability(capability),
            )
            .unwrap();
        schema
            .declare(
                RecordDecl::new(derived.clone())
                    .extends(TypeExpr::named(&base))
                    .field(FieldDecl::new("y", TypeExpr::int()))
                    .capability(capability),
            )
            .unwrap();
        schema.class(&derived).unwrap()
    }

    #[test]
    fn inherited_field_order() {
        let schema = Schema::new();
        for (index, capability) in ALL.into_iter().enumerate() {
            let class = inherited(&schema, &format!("app{index}"), capability);
            assert_eq!(class.field_names().collect::<Vec<_>>(), ["x", "y"]);

            let record = class.construct([("x", 1.into()), ("y", 2.into())]).unwrap();
            let plain = record.to_plain().unwrap();
            let keys: Vec<&str> = plain.as_map().unwrap().keys().map(|k| k.as_str()).collect();
            assert_eq!(keys, ["x", "y"]);
            assert_eq!(class.from_plain(&plain).unwrap(), record);
        }
    }

    #[cfg(feature = "msgpack")]
    #[test]
    fn inherited_msgpack_round_trip() {
        let schema = Schema::new();
        let class = inherited(&schema, "app", Capabilities::MSGPACK);

        let record = class.construct([("x", 1.into()), ("y", 2.into())]).unwrap();
        assert_eq!(
            record.pack().unwrap(),
            Value::map([("x", Value::Int(1)), ("y", Value::Int(2))])
        );

        let bytes = record.to_msgpack().unwrap();
        assert_eq!(bytes, [0x82, 0xa1, b'x', 0x01, 0xa1, b'y', 0x02]);
        assert_eq!(class.from_msgpack(&bytes).unwrap(), record);
    }

    #[cfg(feature = "msgpack")]
    #[test]
    fn nested_record_without_format() {
        let schema = Schema::new();
        schema
            .declare(
                RecordDecl::new("app::Inner")
                    .field(FieldDecl::new("x", TypeExpr::int()))
                    .capability(Capabilities::PLAIN),
            )
            .unwrap();
        schema
            .declare(
                RecordDecl::new("app::Outer")
                    .field(FieldDecl::new("entity", TypeExpr::named("app::Inner")))
                    .capability(Capabilities::MSGPACK),
            )
            .unwrap();
        let inner = schema.class("app::Inner").unwrap();
        let outer = schema.class("app::Outer").unwrap();

        let entity = inner.construct([("x", 1.into())]).unwrap();
        assert!(matches!(
            entity.to_msgpack(),
            Err(SerialError::Unsupported { format: "msgpack", .. })
        ));

        let record = outer.construct([("entity", entity.into())]).unwrap();
        let bytes = record.to_msgpack().unwrap();
        let mut expected = Vec::from([0x81, 0xa6]);
        expected.extend_from_slice(b"entity");
        expected.extend_from_slice(&[0x81, 0xa1, b'x', 0x01]);
        assert_eq!(bytes, expected);

        let decoded = outer.from_msgpack(&bytes).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.get("entity").unwrap().as_record().unwrap().class(), &inner);
    }

    #[cfg(feature = "msgpack")]
    #[test]
    fn composite_of_wrappers() {
        let schema = Schema::new();
        let b = inherited(&schema, "app", Capabilities::PLAIN);
        let a = schema.class("app::A").unwrap();
        schema
            .declare(
                RecordDecl::new("app::AWrapper")
                    .field(FieldDecl::new("entity", TypeExpr::named("app::A")))
                    .capability(Capabilities::PLAIN),
            )
            .unwrap();
        schema
            .declare(
                RecordDecl::new("app::BWrapper")
                    .field(FieldDecl::new("entity", TypeExpr::named("app::B")))
                    .capability(Capabilities::MSGPACK),
            )
            .unwrap();
        schema
            .declare(
                RecordDecl::new("app::Composite")
                    .field(FieldDecl::new("a", TypeExpr::named("app::AWrapper")))
                    .field(FieldDecl::new("b", TypeExpr::named("app::BWrapper")))
                    .capability(Capabilities::MSGPACK),
            )
            .unwrap();

        let wrap = |path: &str, entity: Data| {
            schema.class(path).unwrap().construct([("entity", entity)]).unwrap()
        };
        let record = schema
            .class("app::Composite")
            .unwrap()
            .construct([
                ("a", wrap("app::AWrapper", a.construct([("x", 1.into())]).unwrap().into()).into()),
                (
                    "b",
                    wrap(
                        "app::BWrapper",
                        b.construct([("x", 1.into()), ("y", 2.into())]).unwrap().into(),
                    )
                    .into(),
                ),
            ])
            .unwrap();

        let expected = Value::map([
            ("a", Value::map([("entity", Value::map([("x", Value::Int(1))]))])),
            (
                "b",
                Value::map([(
                    "entity",
                    Value::map([("x", Value::Int(1)), ("y", Value::Int(2))]),
                )]),
            ),
        ]);
        assert_eq!(record.pack().unwrap(), expected);

        let bytes = record.to_msgpack().unwrap();
        assert_eq!(record.class().from_msgpack(&bytes).unwrap(), record);
    }

    #[test]
    fn fixed_attributes() {
        let schema = Schema::new();
        for (index, capability) in ALL.into_iter().enumerate() {
            let path = format!("app::Fixed{index}");
            schema
                .declare(
                    RecordDecl::new(path.clone())
                        .field(FieldDecl::new("x", TypeExpr::int()))
                        .capability(capability)
                        .fixed_attributes(),
                )
                .unwrap();
            let class = schema.class(&path).unwrap();
            assert!(class.is_fixed());

            let mut record = class.construct([("x", 1.into())]).unwrap();
            let err = record.set("y", 2).unwrap_err();
            assert_eq!(err.to_string(), format!("record `app.Fixed{index}` has no attribute `y`"));
            record.set("x", 5).unwrap();
            assert_eq!(record.get("x"), Some(&Data::Int(5)));

            let mut decoded = class.from_plain(&record.to_plain().unwrap()).unwrap();
            assert!(matches!(
                decoded.set("y", 2),
                Err(SerialError::NoAttribute { ref attribute, .. }) if attribute == "y"
            ));
            assert_eq!(decoded.extra_attributes().count(), 0);
        }
    }

    #[cfg(all(feature = "json", feature = "yaml"))]
    #[test]
    fn fixed_attributes_survive_decoding() {
        let schema = Schema::new();
        for (path, capability) in [("app::J", Capabilities::JSON), ("app::Y", Capabilities::YAML)] {
            schema
                .declare(
                    RecordDecl::new(path)
                        .field(FieldDecl::new("x", TypeExpr::int()))
                        .capability(capability)
                        .fixed_attributes(),
                )
                .unwrap();
        }
        let json = schema.class("app::J").unwrap();
        let yaml = schema.class("app::Y").unwrap();

        let mut from_json = json.from_json(r#"{"x":1}"#).unwrap();
        assert!(from_json.set("z", 0).is_err());
        let mut from_yaml = yaml.from_yaml("x: 1\n").unwrap();
        assert!(from_yaml.set("z", 0).is_err());
    }

    #[test]
    fn open_records_keep_extra_attributes() {
        let schema = Schema::new();
        schema
            .declare(
                RecordDecl::new("app::Open")
                    .field(FieldDecl::new("x", TypeExpr::int()))
                    .capability(Capabilities::PLAIN),
            )
            .unwrap();
        let class = schema.class("app::Open").unwrap();

        let plain = class.construct([("x", 1.into())]).unwrap();
        let mut noted = plain.clone();
        noted.set("note", "hi").unwrap();
        noted.set("note", "again").unwrap();

        assert_eq!(noted.get("note").and_then(Data::as_str), Some("again"));
        assert_eq!(noted.extra_attributes().count(), 1);
        assert_eq!(noted.to_plain().unwrap(), Value::map([("x", Value::Int(1))]));
        assert_eq!(noted, plain);
    }

    #[test]
    fn base_and_zero_field_records() {
        assert_eq!(BaseRecord.to_plain(), None);
        assert_eq!(BaseRecord::from_plain(&Value::Int(1)), None);

        let schema = Schema::new();
        schema
            .declare(RecordDecl::new("app::Empty").capability(Capabilities::PLAIN))
            .unwrap();
        let empty = schema.class("app::Empty").unwrap();

        let record = empty.construct([]).unwrap();
        assert_eq!(record.to_plain().unwrap(), Value::map::<&str, _>([]));
        assert_eq!(empty.from_plain(&Value::Null).unwrap(), record);
    }

    #[test]
    fn capabilities_gate_conversions() {
        let schema = Schema::new();
        schema
            .declare(RecordDecl::new("app::Bare").field(FieldDecl::new("x", TypeExpr::int())))
            .unwrap();
        let bare = schema.class("app::Bare").unwrap();
        let record = bare.construct([("x", 1.into())]).unwrap();

        assert_eq!(record.pack().unwrap(), Value::map([("x", Value::Int(1))]));
        let err = record.to_plain().unwrap_err();
        assert_eq!(err.to_string(), "app.Bare does not support the plain format");
        assert!(bare.from_plain(&Value::map([("x", Value::Int(1))])).is_err());
        assert_eq!(bare.unpack(&Value::map([("x", Value::Int(1))])).unwrap(), record);
    }

    #[test]
    fn capabilities_are_inherited() {
        let schema = Schema::new();
        schema
            .declare(RecordDecl::new("app::Base").capability(Capabilities::JSON))
            .unwrap();
        schema
            .declare(
                RecordDecl::new("app::Child")
                    .extends(TypeExpr::named("app::Base"))
                    .capability(Capabilities::YAML),
            )
            .unwrap();
        let child = schema.class("app::Child").unwrap();
        assert_eq!(child.capabilities(), Capabilities::JSON | Capabilities::YAML);
    }

    #[test]
    fn construction_errors() {
        let schema = Schema::new();
        schema
            .declare(
                RecordDecl::new("app::Point")
                    .field(FieldDecl::new("x", TypeExpr::int()))
                    .field(FieldDecl::new("y", TypeExpr::int()).default(0)),
            )
            .unwrap();
        let point = schema.class("app::Point").unwrap();

        let err = point.construct([("z", 1.into())]).unwrap_err();
        assert_eq!(err.to_string(), "record `app.Point` has no attribute `z`");

        let err = point.construct([("y", 1.into())]).unwrap_err();
        assert!(matches!(err, SerialError::MissingField(ref missing) if missing.name == "x"));

        let record = point.from_values(Vec::from([Data::Int(3)])).unwrap();
        assert_eq!(record.values(), [Data::Int(3), Data::Int(0)]);
        assert!(point.from_values(Vec::from([Data::Int(1), Data::Int(2), Data::Int(3)])).is_err());

        let err = record.class().construct([("x", "three".into())]).unwrap().pack().unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Field "x" of type schema.int in app.Point is not serializable: expected int, found str"#
        );
    }

    #[cfg(all(feature = "json", feature = "yaml"))]
    #[test]
    fn text_format_round_trips() {
        let schema = Schema::new();
        schema
            .declare(
                RecordDecl::new("app::Doc")
                    .field(FieldDecl::new("name", TypeExpr::str()))
                    .field(FieldDecl::new("tags", "List<str>".parse().unwrap()))
                    .field(FieldDecl::new("scores", "Dict<int, float>".parse().unwrap()))
                    .field(FieldDecl::new("blob", TypeExpr::bytes()))
                    .field(FieldDecl::new("pair", "Tuple<int, str>".parse().unwrap()))
                    .field(FieldDecl::new("parent", "Optional<str>".parse().unwrap()).default(Data::None))
                    .capability(Capabilities::JSON | Capabilities::YAML),
            )
            .unwrap();
        let doc = schema.class("app::Doc").unwrap();

        let record = doc
            .construct([
                ("name", "ada".into()),
                ("tags", Data::list(["a".into(), "b".into()])),
                ("scores", Data::map([(Data::Int(1), Data::Float(0.5)), (Data::Int(2), Data::Float(1.5))])),
                ("blob", Vec::from([0_u8, 7, 255]).into()),
                ("pair", Data::tuple([Data::Int(1), "one".into()])),
            ])
            .unwrap();

        let json = record.to_json().unwrap();
        assert!(json.starts_with(r#"{"name":"ada","tags":["a","b"],"scores":{"1":0.5,"2":1.5}"#));
        assert_eq!(doc.from_json(&json).unwrap(), record);

        let yaml = record.to_yaml().unwrap();
        assert_eq!(doc.from_yaml(&yaml).unwrap(), record);

        let err = doc.from_json("{").unwrap_err();
        assert!(matches!(err, SerialError::Codec { format: "json", .. }));
    }
}
