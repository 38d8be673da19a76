use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::plan::{Fault, Plan};
use crate::data::Data;
use crate::error::{MissingField, SerialError, SerialResult, UnserializableField};
use crate::schema::{FieldSpec, PackHook, RecordSpec, Schema, UnpackHook};
use crate::types::{TypeDescriptor, TypeExpr};
use crate::value::{Map, Value};

// -----------------------------------------------------------------------------
// FieldPlan

struct FieldPlan {
    name: Arc<str>,
    alias: Arc<str>,
    ty: TypeExpr,
    plan: Plan,
    default: Option<Data>,
    omit_if_default: bool,
    pack: Option<PackHook>,
    unpack: Option<UnpackHook>,
}

impl FieldPlan {
    fn new(field: &FieldSpec, ty: TypeExpr, plan: Plan) -> Self {
        Self {
            name: field.name.clone(),
            alias: field.alias.clone(),
            ty,
            plan,
            default: field.default.clone(),
            omit_if_default: field.omit_if_default,
            pack: field.pack.clone(),
            unpack: field.unpack.clone(),
        }
    }

    fn normalize(&self, data: Data) -> Data {
        match &self.pack {
            Some(_) => data,
            None => self.plan.normalize(data),
        }
    }

    fn pack(&self, data: &Data) -> Result<Value, Fault> {
        match &self.pack {
            Some(hook) => hook(data).map_err(Fault::Mismatch),
            None => self.plan.pack(data),
        }
    }

    fn unpack(&self, value: &Value) -> Result<Data, Fault> {
        match &self.unpack {
            Some(hook) => hook(value).map_err(Fault::Mismatch),
            None => self.plan.unpack(value),
        }
    }
}

fn field_error(name: &str, ty: &TypeExpr, holder: &TypeExpr, fault: Fault) -> SerialError {
    let err = UnserializableField::new(name, ty.clone(), holder.clone());
    match fault {
        Fault::Mismatch(message) => err.with_message(message).into(),
        Fault::Nested(inner) => err.caused_by(inner).into(),
    }
}

// -----------------------------------------------------------------------------
// CompiledConverter

/// The pack and unpack routines of one record type.
///
/// A converter is compiled once per record, or once per argument list
/// for a generic record, and shared by every class handle and instance
/// of that type. Field plans are resolved when compiling, so converting
/// a value never inspects a type again.
pub struct CompiledConverter {
    ty: TypeExpr,
    spec: Arc<RecordSpec>,
    fields: Vec<FieldPlan>,
}

impl CompiledConverter {
    /// Compiles `spec` applied to `args`.
    ///
    /// Field types of a generic record are substituted and resolved again.
    /// Declared defaults must pack through their field's plan.
    pub(crate) fn compile(
        schema: &Schema,
        spec: Arc<RecordSpec>,
        args: Vec<TypeExpr>,
    ) -> SerialResult<Self> {
        let expected = spec.type_params.len();
        if args.len() != expected {
            return Err(SerialError::TypeArguments {
                path: spec.path.to_string(),
                expected,
                found: args.len(),
            });
        }
        let ty = TypeExpr::generic(&spec.path, args.iter().cloned());

        let resolved: Vec<(TypeExpr, TypeDescriptor)> = if args.is_empty() {
            spec.fields
                .iter()
                .map(|field| (field.ty.clone(), field.descriptor.clone()))
                .collect()
        } else {
            schema.with_resolver(|resolver| {
                spec.fields
                    .iter()
                    .map(|field| {
                        let field_ty = field.ty.substitute(&spec.type_params, &args);
                        match resolver.resolve(&field_ty) {
                            Ok(descriptor) => Ok((field_ty, descriptor)),
                            Err(err) => {
                                let reason = err.reason_for(&field_ty);
                                let err = UnserializableField::new(&*field.name, field_ty, ty.clone());
                                Err(match reason {
                                    Some(reason) => err.with_message(reason).into(),
                                    None => err.into(),
                                })
                            }
                        }
                    })
                    .collect::<SerialResult<Vec<_>>>()
            })?
        };

        let mut fields = Vec::with_capacity(resolved.len());
        for (field, (field_ty, descriptor)) in spec.fields.iter().zip(resolved) {
            let plan = Plan::build(schema, &descriptor)
                .map_err(|fault| field_error(&field.name, &field_ty, &ty, fault))?;
            let mut compiled = FieldPlan::new(field, field_ty, plan);

            if compiled.pack.is_none()
                && let Some(default) = compiled.default.take()
            {
                let default = compiled.plan.normalize(default);
                compiled
                    .plan
                    .pack(&default)
                    .map_err(|fault| field_error(&compiled.name, &compiled.ty, &ty, fault))?;
                compiled.default = Some(default);
            }
            fields.push(compiled);
        }

        Ok(Self { ty, spec, fields })
    }

    /// Returns the record type, generic arguments included.
    #[inline]
    pub fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    #[inline]
    pub fn spec(&self) -> &Arc<RecordSpec> {
        &self.spec
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| &*field.name)
    }

    /// Returns the concrete type of each field, in order.
    pub fn field_types(&self) -> impl Iterator<Item = &TypeExpr> {
        self.fields.iter().map(|field| &field.ty)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| &*field.name == name)
    }

    /// Completes positional field values with defaults.
    ///
    /// Fails with `MissingField` on the first absent field without default.
    pub(crate) fn fill(&self, slots: Vec<Option<Data>>) -> SerialResult<Vec<Data>> {
        self.fields
            .iter()
            .zip(slots)
            .map(|(field, slot)| match slot {
                Some(data) => Ok(field.normalize(data)),
                None => self.default_of(field),
            })
            .collect()
    }

    /// Normalizes a value assigned to the field at `index`.
    pub(crate) fn normalize(&self, index: usize, data: Data) -> Data {
        match self.fields.get(index) {
            Some(field) => field.normalize(data),
            None => data,
        }
    }

    fn default_of(&self, field: &FieldPlan) -> SerialResult<Data> {
        match &field.default {
            Some(default) => Ok(default.clone()),
            None => Err(MissingField::new(&*field.name, field.ty.clone(), self.ty.clone()).into()),
        }
    }

    // -------------------------------------------------------------------------
    // pack

    /// Packs the field values of an instance into a plain-data map.
    ///
    /// `values` holds one value per field, in field order.
    pub fn pack(&self, values: &[Data]) -> SerialResult<Value> {
        let mut output = Map::with_capacity(self.fields.len());

        for (field, data) in self.fields.iter().zip(values) {
            if self.spec.omit_none && data.is_none() {
                continue;
            }
            if field.omit_if_default && field.default.as_ref() == Some(data) {
                continue;
            }
            let value = field
                .pack(data)
                .map_err(|fault| field_error(&field.name, &field.ty, &self.ty, fault))?;
            output.insert(field.alias.to_string(), value);
        }

        Ok(Value::Map(output))
    }

    // -------------------------------------------------------------------------
    // unpack

    /// Unpacks the field values of an instance from plain data.
    ///
    /// A record without fields accepts any input.
    pub fn unpack(&self, value: &Value) -> SerialResult<Vec<Data>> {
        if self.fields.is_empty() {
            return Ok(Vec::new());
        }
        let Value::Map(map) = value else {
            return Err(SerialError::ExpectedMapping {
                record: self.ty.clone(),
                found: value.kind_name(),
            });
        };

        if self.spec.forbid_extra_keys {
            let keys: Vec<String> = map
                .keys()
                .filter(|key| !self.fields.iter().any(|field| *field.alias == ***key))
                .cloned()
                .collect();
            if !keys.is_empty() {
                return Err(SerialError::ExtraKeys {
                    record: self.ty.clone(),
                    keys,
                });
            }
        }

        self.fields
            .iter()
            .map(|field| match map.get(&*field.alias) {
                Some(value) => field
                    .unpack(value)
                    .map_err(|fault| field_error(&field.name, &field.ty, &self.ty, fault)),
                None => self.default_of(field),
            })
            .collect()
    }
}

impl fmt::Debug for CompiledConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledConverter")
            .field("ty", &self.ty)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
