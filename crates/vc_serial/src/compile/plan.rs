use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::converter::CompiledConverter;
use crate::data::Data;
use crate::error::SerialError;
use crate::record::{Record, RecordClass};
use crate::schema::{CustomCodec, EnumType, Schema, key_of};
use crate::types::{ScalarKind, TypeDescriptor, TypeExpr};
use crate::value::{Map, Value};

// -----------------------------------------------------------------------------
// Fault

/// Why a value could not be converted by a plan.
///
/// The compiled converter turns a fault into an `UnserializableField`
/// naming the field the plan belongs to.
#[derive(Debug)]
pub(crate) enum Fault {
    Mismatch(String),
    Nested(SerialError),
}

impl Fault {
    fn mismatch(expected: impl fmt::Display, found: &str) -> Self {
        Self::Mismatch(format!("expected {expected}, found {found}"))
    }

    /// Prefixes a mismatch with the position it occurred at.
    fn at(self, context: impl fmt::Display) -> Self {
        match self {
            Self::Mismatch(message) => Self::Mismatch(format!("{context}: {message}")),
            nested => nested,
        }
    }
}

// -----------------------------------------------------------------------------
// Plan

/// A conversion plan for one field type.
///
/// Built once from a concrete descriptor. Nested records hold their own
/// compiled converter, so running a plan never looks anything up.
pub(crate) enum Plan {
    Scalar(ScalarKind),
    Optional(Box<Plan>),
    Union { ty: TypeExpr, alternatives: Vec<Plan> },
    Sequence(Box<Plan>),
    Mapping(Box<Plan>, Box<Plan>),
    Tuple(Vec<Plan>),
    Enum(Arc<EnumType>),
    Record(Arc<CompiledConverter>),
    Custom(Arc<CustomCodec>),
}

impl Plan {
    pub fn build(schema: &Schema, descriptor: &TypeDescriptor) -> Result<Plan, Fault> {
        let all = |items: &[TypeDescriptor]| {
            items
                .iter()
                .map(|item| Plan::build(schema, item))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(match descriptor {
            TypeDescriptor::Scalar(kind) => Plan::Scalar(*kind),
            TypeDescriptor::Optional(inner) => Plan::Optional(Box::new(Plan::build(schema, inner)?)),
            TypeDescriptor::Union(items) => Plan::Union {
                ty: descriptor.type_expr(),
                alternatives: all(items)?,
            },
            TypeDescriptor::Sequence(item) => Plan::Sequence(Box::new(Plan::build(schema, item)?)),
            TypeDescriptor::Mapping(key, value) => Plan::Mapping(
                Box::new(Plan::build(schema, key)?),
                Box::new(Plan::build(schema, value)?),
            ),
            TypeDescriptor::Tuple(items) => Plan::Tuple(all(items)?),
            TypeDescriptor::Enum(enum_type) => Plan::Enum(enum_type.clone()),
            TypeDescriptor::NestedRecord(spec) => {
                Plan::Record(schema.converter(spec, &[]).map_err(Fault::Nested)?)
            }
            TypeDescriptor::Generic(spec, args) => {
                Plan::Record(schema.converter(spec, args).map_err(Fault::Nested)?)
            }
            TypeDescriptor::Custom(codec) => Plan::Custom(codec.clone()),
            TypeDescriptor::Param(name) => {
                return Err(Fault::Mismatch(format!("type parameter `{name}` is not bound")));
            }
        })
    }

    /// A short description of what the plan accepts.
    fn expected(&self) -> String {
        match self {
            Plan::Scalar(kind) => kind.name().to_string(),
            Plan::Optional(inner) => format!("optional {}", inner.expected()),
            Plan::Union { ty, .. } => ty.to_string(),
            Plan::Sequence(_) => String::from("list"),
            Plan::Mapping(..) => String::from("map"),
            Plan::Tuple(items) => format!("tuple of {}", items.len()),
            Plan::Enum(enum_type) => enum_type.ty().to_string(),
            Plan::Record(converter) => converter.ty().to_string(),
            Plan::Custom(codec) => codec.ty().to_string(),
        }
    }

    /// Whether the runtime shape of `data` is the one this plan is for.
    ///
    /// Used to pick a union alternative on pack, so numbers are not
    /// promoted and records must be of the exact class.
    pub fn matches(&self, data: &Data) -> bool {
        match (self, data) {
            (Plan::Scalar(kind), _) => matches!(
                (kind, data),
                (ScalarKind::None, Data::None)
                    | (ScalarKind::Bool, Data::Bool(_))
                    | (ScalarKind::Int, Data::Int(_))
                    | (ScalarKind::Float, Data::Float(_))
                    | (ScalarKind::Str, Data::Str(_))
                    | (ScalarKind::Bytes, Data::Bytes(_))
            ),
            (Plan::Optional(inner), _) => data.is_none() || inner.matches(data),
            (Plan::Union { alternatives, .. }, _) => alternatives.iter().any(|alt| alt.matches(data)),
            (Plan::Sequence(_), Data::List(_)) => true,
            (Plan::Mapping(..), Data::Map(_)) => true,
            (Plan::Tuple(plans), Data::Tuple(items)) => plans.len() == items.len(),
            (Plan::Enum(enum_type), Data::Enum(value)) => value.path() == enum_type.path(),
            (Plan::Record(converter), Data::Record(record)) => record.class().ty() == converter.ty(),
            (Plan::Custom(_), _) => true,
            _ => false,
        }
    }

    /// Brings `data` to the shape `unpack` would produce for it.
    ///
    /// Integers become floats where a float is declared, so an instance
    /// built by hand compares equal to its own unpacked form.
    pub fn normalize(&self, data: Data) -> Data {
        match (self, data) {
            (Plan::Scalar(ScalarKind::Float), Data::Int(v)) => Data::Float(v as f64),
            (Plan::Optional(_), Data::None) => Data::None,
            (Plan::Optional(inner), data) => inner.normalize(data),
            (Plan::Union { alternatives, .. }, data) => {
                if alternatives.iter().any(|alt| alt.matches(&data)) {
                    return data;
                }
                for alt in alternatives {
                    let normal = alt.normalize(data.clone());
                    if alt.matches(&normal) {
                        return normal;
                    }
                }
                data
            }
            (Plan::Sequence(item), Data::List(items)) => {
                Data::List(items.into_iter().map(|data| item.normalize(data)).collect())
            }
            (Plan::Tuple(plans), Data::Tuple(items)) if plans.len() == items.len() => Data::Tuple(
                plans.iter().zip(items).map(|(plan, data)| plan.normalize(data)).collect(),
            ),
            (Plan::Mapping(key, value), Data::Map(entries)) => Data::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (key.normalize(k), value.normalize(v)))
                    .collect(),
            ),
            (_, data) => data,
        }
    }

    // -------------------------------------------------------------------------
    // pack

    pub fn pack(&self, data: &Data) -> Result<Value, Fault> {
        match (self, data) {
            (Plan::Scalar(kind), _) => pack_scalar(*kind, data),
            (Plan::Optional(_), Data::None) => Ok(Value::Null),
            (Plan::Optional(inner), _) => inner.pack(data),
            (Plan::Union { ty, alternatives }, _) => alternatives
                .iter()
                .filter(|alt| alt.matches(data))
                .find_map(|alt| alt.pack(data).ok())
                .ok_or_else(|| {
                    Fault::Mismatch(format!(
                        "no alternative of {ty} accepts a {} value",
                        data.kind_name()
                    ))
                }),
            (Plan::Sequence(item), Data::List(items)) => items
                .iter()
                .enumerate()
                .map(|(index, data)| item.pack(data).map_err(|f| f.at(format_args!("item {index}"))))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Seq),
            (Plan::Tuple(plans), Data::Tuple(items)) => {
                if plans.len() != items.len() {
                    return Err(Fault::mismatch(
                        format_args!("{} items", plans.len()),
                        &items.len().to_string(),
                    ));
                }
                plans
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(index, (plan, data))| {
                        plan.pack(data).map_err(|f| f.at(format_args!("item {index}")))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Seq)
            }
            (Plan::Mapping(key, value), Data::Map(entries)) => {
                let mut map = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    let k = key.key_to_string(k)?;
                    if map.contains_key(&k) {
                        return Err(Fault::Mismatch(format!("key {k:?} appears twice")));
                    }
                    let v = value.pack(v).map_err(|f| f.at(format_args!("key {k:?}")))?;
                    map.insert(k, v);
                }
                Ok(Value::Map(map))
            }
            (Plan::Enum(enum_type), Data::Enum(member)) => {
                enum_type.plain_value(member).cloned().ok_or_else(|| {
                    Fault::Mismatch(format!("{member:?} is not a member of {}", enum_type.ty()))
                })
            }
            (Plan::Record(converter), Data::Record(record)) => {
                if record.class().ty() != converter.ty() {
                    return Err(Fault::mismatch(converter.ty(), &record.class().name()));
                }
                converter.pack(record.values()).map_err(Fault::Nested)
            }
            (Plan::Custom(codec), _) => codec.pack(data).map_err(Fault::Mismatch),
            (plan, _) => Err(Fault::mismatch(plan.expected(), data.kind_name())),
        }
    }

    /// Renders a map key of this plan's type as a string.
    fn key_to_string(&self, data: &Data) -> Result<String, Fault> {
        match (self, data) {
            (Plan::Scalar(ScalarKind::Str), Data::Str(s)) => Ok(s.clone()),
            (Plan::Scalar(ScalarKind::Int), Data::Int(i)) => Ok(i.to_string()),
            (Plan::Scalar(ScalarKind::Float), Data::Float(f)) => Ok(f.to_string()),
            (Plan::Scalar(ScalarKind::Float), Data::Int(i)) => Ok((*i as f64).to_string()),
            (Plan::Scalar(ScalarKind::Bool), Data::Bool(b)) => Ok(b.to_string()),
            (Plan::Enum(enum_type), Data::Enum(member)) => enum_type
                .plain_value(member)
                .and_then(key_of)
                .ok_or_else(|| {
                    Fault::Mismatch(format!("{member:?} is not a member of {}", enum_type.ty()))
                }),
            (plan, _) => Err(Fault::Mismatch(format!(
                "a {} cannot be used as a {} key",
                data.kind_name(),
                plan.expected()
            ))),
        }
    }

    // -------------------------------------------------------------------------
    // unpack

    pub fn unpack(&self, value: &Value) -> Result<Data, Fault> {
        match (self, value) {
            (Plan::Scalar(kind), _) => unpack_scalar(*kind, value),
            (Plan::Optional(_), Value::Null) => Ok(Data::None),
            (Plan::Optional(inner), _) => inner.unpack(value),
            (Plan::Union { ty, alternatives }, _) => alternatives
                .iter()
                .find_map(|alt| alt.unpack(value).ok())
                .ok_or_else(|| {
                    Fault::Mismatch(format!(
                        "a {} value matches no alternative of {ty}",
                        value.kind_name()
                    ))
                }),
            (Plan::Sequence(item), Value::Seq(items)) => items
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    item.unpack(value).map_err(|f| f.at(format_args!("item {index}")))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Data::List),
            (Plan::Tuple(plans), Value::Seq(items)) => {
                if plans.len() != items.len() {
                    return Err(Fault::mismatch(
                        format_args!("{} items", plans.len()),
                        &items.len().to_string(),
                    ));
                }
                plans
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(index, (plan, value))| {
                        plan.unpack(value).map_err(|f| f.at(format_args!("item {index}")))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Data::Tuple)
            }
            (Plan::Mapping(key, item), Value::Map(map)) => map
                .iter()
                .map(|(k, v)| {
                    let data = item.unpack(v).map_err(|f| f.at(format_args!("key {k:?}")))?;
                    Ok((key.key_from_str(k)?, data))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Data::Map),
            (Plan::Enum(enum_type), _) => {
                enum_type.from_plain(value).map(Data::Enum).ok_or_else(|| {
                    Fault::Mismatch(format!("{value} is not a value of {}", enum_type.ty()))
                })
            }
            (Plan::Record(converter), _) => match converter.unpack(value) {
                Ok(values) => {
                    let class = RecordClass::new(converter.clone());
                    Ok(Data::Record(Box::new(Record::from_parts(class, values))))
                }
                Err(err) => Err(Fault::Nested(err)),
            },
            (Plan::Custom(codec), _) => codec.unpack(value).map_err(Fault::Mismatch),
            (plan, _) => Err(Fault::mismatch(plan.expected(), value.kind_name())),
        }
    }

    /// Parses a map key back into this plan's type.
    fn key_from_str(&self, key: &str) -> Result<Data, Fault> {
        let parsed = match self {
            Plan::Scalar(ScalarKind::Str) => Some(Data::Str(String::from(key))),
            Plan::Scalar(ScalarKind::Int) => key.parse().ok().map(Data::Int),
            Plan::Scalar(ScalarKind::Float) => key.parse().ok().map(Data::Float),
            Plan::Scalar(ScalarKind::Bool) => match key {
                "true" => Some(Data::Bool(true)),
                "false" => Some(Data::Bool(false)),
                _ => None,
            },
            Plan::Enum(enum_type) => enum_type.from_key(key).map(Data::Enum),
            _ => None,
        };
        parsed.ok_or_else(|| Fault::Mismatch(format!("key {key:?} does not parse as {}", self.expected())))
    }
}

// -----------------------------------------------------------------------------
// Scalars

fn pack_scalar(kind: ScalarKind, data: &Data) -> Result<Value, Fault> {
    match (kind, data) {
        (ScalarKind::None, Data::None) => Ok(Value::Null),
        (ScalarKind::Bool, Data::Bool(v)) => Ok(Value::Bool(*v)),
        (ScalarKind::Int, Data::Int(v)) => Ok(Value::Int(*v)),
        (ScalarKind::Float, Data::Float(v)) => Ok(Value::Float(*v)),
        (ScalarKind::Float, Data::Int(v)) => Ok(Value::Float(*v as f64)),
        (ScalarKind::Str, Data::Str(v)) => Ok(Value::Str(v.clone())),
        (ScalarKind::Bytes, Data::Bytes(v)) => Ok(Value::Bytes(v.clone())),
        _ => Err(Fault::mismatch(kind, data.kind_name())),
    }
}

fn unpack_scalar(kind: ScalarKind, value: &Value) -> Result<Data, Fault> {
    match (kind, value) {
        (ScalarKind::None, Value::Null) => Ok(Data::None),
        (ScalarKind::Bool, Value::Bool(v)) => Ok(Data::Bool(*v)),
        (ScalarKind::Int, Value::Int(v)) => Ok(Data::Int(*v)),
        (ScalarKind::Float, Value::Float(v)) => Ok(Data::Float(*v)),
        (ScalarKind::Float, Value::Int(v)) => Ok(Data::Float(*v as f64)),
        (ScalarKind::Str, Value::Str(v)) => Ok(Data::Str(v.clone())),
        (ScalarKind::Bytes, Value::Bytes(v)) => Ok(Data::Bytes(v.clone())),
        // Text formats carry bytes as a sequence of integers.
        (ScalarKind::Bytes, Value::Seq(items)) => items
            .iter()
            .map(|item| match item {
                Value::Int(byte) => u8::try_from(*byte).ok(),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()
            .map(Data::Bytes)
            .ok_or_else(|| Fault::Mismatch(String::from("expected bytes, found a non-byte sequence"))),
        _ => Err(Fault::mismatch(kind, value.kind_name())),
    }
}

// -----------------------------------------------------------------------------
// Tests
