use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::build::{build_spec, check_path};
use super::codec::CustomCodec;
use super::decl::{EnumDecl, RecordDecl};
use super::enums::{EnumType, key_of};
use super::spec::RecordSpec;
use crate::compile::{CompiledConverter, ConverterCache};
use crate::error::{SerialError, SerialResult};
use crate::hash::HashMap;
use crate::record::RecordClass;
use crate::types::{ResolveError, Resolver, TypeDescriptor, TypeExpr};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Tables

/// Declared records, enums and custom codecs.
#[derive(Default)]
pub(crate) struct Tables {
    pub records: HashMap<Arc<str>, Arc<RecordSpec>>,
    pub enums: HashMap<Arc<str>, Arc<EnumType>>,
    pub codecs: HashMap<TypeExpr, Arc<CustomCodec>>,
}

impl Tables {
    /// Whether `path` already names a record, an enum or a codec type.
    pub fn contains_path(&self, path: &str) -> bool {
        self.records.contains_key(path)
            || self.enums.contains_key(path)
            || self.codecs.keys().any(|ty| ty.path() == Some(path))
    }
}

// -----------------------------------------------------------------------------
// Schema

/// A registry of declared types and the owner of their compiled converters.
///
/// Declarations are checked and finalized when registered. Converters are
/// compiled on first use of a record (or generic instantiation) and cached
/// for the life of the schema.
///
/// `Schema` is `Send + Sync`; share it behind an `Arc` or a `static`.
///
/// # Concurrency
///
/// The declaration tables and the converter cache are separate
/// [`RwLock`]s. Declaring builds the spec under the read lock and only
/// takes the write lock to publish it. A converter is compiled without
/// holding either lock; when two threads compile the same instantiation,
/// the first to publish wins and the other build is dropped.
///
/// # Examples
///
/// ```
/// use vc_serial::{Capabilities, FieldDecl, RecordDecl, Schema, TypeExpr, Value};
///
/// let schema = Schema::new();
/// schema
///     .declare(
///         RecordDecl::new("app::Point")
///             .field(FieldDecl::new("x", TypeExpr::int()))
///             .field(FieldDecl::new("y", TypeExpr::int()))
///             .capability(Capabilities::JSON),
///     )
///     .unwrap();
///
/// let point = schema.class("app::Point").unwrap();
/// let p = point.construct([("x", 1.into()), ("y", 2.into())]).unwrap();
///
/// assert_eq!(p.to_json().unwrap(), r#"{"x":1,"y":2}"#);
/// assert_eq!(point.from_json(r#"{"y":2,"x":1}"#).unwrap(), p);
/// ```
#[derive(Default)]
pub struct Schema {
    tables: RwLock<Tables>,
    cache: ConverterCache,
}

impl Schema {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Declares a record type.
    ///
    /// Every field type must resolve against the types declared so far,
    /// so a record can never refer to itself. Returns the finalized spec.
    ///
    /// # Errors
    ///
    /// - [`SerialError::InvalidDeclaration`]: bad or duplicate path, field or parameter names.
    /// - [`SerialError::UnknownRecord`]: a base is not declared.
    /// - [`SerialError::TypeArguments`]: a base has the wrong number of type arguments.
    /// - [`SerialError::UnserializableField`]: a field type has no descriptor.
    pub fn declare(&self, decl: RecordDecl) -> SerialResult<Arc<RecordSpec>> {
        let spec = {
            let tables = self.read();
            Arc::new(build_spec(&tables, decl)?)
        };

        let eager = if spec.eager && !spec.is_generic() {
            Some(CompiledConverter::compile(self, spec.clone(), Vec::new())?)
        } else {
            None
        };

        {
            let mut tables = self.write();
            if tables.contains_path(&spec.path) {
                return Err(SerialError::invalid(&spec.path, "the path is already declared"));
            }
            tables.records.insert(spec.path.clone(), spec.clone());
        }

        log::debug!(
            "declared record `{}` with {} fields",
            spec.ty(),
            spec.fields.len()
        );

        if let Some(converter) = eager {
            self.cache.publish(converter);
        }
        Ok(spec)
    }

    /// Declares an enumeration.
    ///
    /// Member values must be strings or integers, unique within the enum.
    pub fn declare_enum(&self, decl: EnumDecl) -> SerialResult<Arc<EnumType>> {
        let EnumDecl { path, members } = decl;
        check_path(&path)?;

        let mut checked: Vec<(Arc<str>, Value)> = Vec::with_capacity(members.len());
        for (name, value) in members {
            if key_of(&value).is_none() {
                return Err(SerialError::invalid(
                    &path,
                    format!("member `{name}` has a {} value", value.kind_name()),
                ));
            }
            if checked.iter().any(|(n, v)| **n == *name || *v == value) {
                return Err(SerialError::invalid(
                    &path,
                    format!("member `{name}` repeats a name or a value"),
                ));
            }
            checked.push((Arc::from(name), value));
        }

        let path: Arc<str> = Arc::from(path);
        let enum_type = Arc::new(EnumType::new(path.clone(), checked));

        let mut tables = self.write();
        if tables.contains_path(&path) {
            return Err(SerialError::invalid(&path, "the path is already declared"));
        }
        tables.enums.insert(path, enum_type.clone());
        Ok(enum_type)
    }

    /// Registers a codec for its exact type expression.
    pub fn register_codec(&self, codec: CustomCodec) -> SerialResult<()> {
        let ty = codec.ty().clone();
        let Some(path) = ty.path() else {
            return Err(SerialError::invalid(
                &format!("{ty}"),
                "a codec cannot convert a type parameter",
            ));
        };
        check_path(path)?;

        let mut tables = self.write();
        if tables.records.contains_key(path)
            || tables.enums.contains_key(path)
            || tables.codecs.contains_key(&ty)
        {
            return Err(SerialError::invalid(path, "the type is already declared"));
        }
        tables.codecs.insert(ty, Arc::new(codec));
        Ok(())
    }

    /// Resolves a type expression against the declared types.
    ///
    /// Type parameters never resolve here.
    pub fn resolve(&self, ty: &TypeExpr) -> Result<TypeDescriptor, ResolveError> {
        let tables = self.read();
        Resolver::new(&tables, &[]).resolve(ty)
    }

    pub fn record_spec(&self, path: &str) -> Option<Arc<RecordSpec>> {
        self.read().records.get(path).cloned()
    }

    pub fn enum_type(&self, path: &str) -> Option<Arc<EnumType>> {
        self.read().enums.get(path).cloned()
    }

    /// Returns the class of a non-generic record.
    #[inline]
    pub fn class(&self, path: &str) -> SerialResult<RecordClass> {
        self.class_of(&TypeExpr::named(path))
    }

    /// Returns the class of a record, or of a generic record instantiation.
    ///
    /// The converter is compiled on the first request for each distinct
    /// instantiation and shared by every later request.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_serial::{FieldDecl, RecordDecl, Schema, TypeExpr};
    ///
    /// let schema = Schema::new();
    /// schema
    ///     .declare(
    ///         RecordDecl::new("app::Pair")
    ///             .type_param("T")
    ///             .field(FieldDecl::new("first", TypeExpr::param("T")))
    ///             .field(FieldDecl::new("second", TypeExpr::param("T"))),
    ///     )
    ///     .unwrap();
    ///
    /// let ints = schema.class_of(&"app::Pair<int>".parse().unwrap()).unwrap();
    /// let strs = schema.class_of(&"app::Pair<str>".parse().unwrap()).unwrap();
    ///
    /// assert_eq!(ints.name(), "app.Pair[int]");
    /// assert_ne!(ints, strs);
    /// assert_eq!(schema.compiled_count(), 2);
    /// ```
    pub fn class_of(&self, ty: &TypeExpr) -> SerialResult<RecordClass> {
        let TypeExpr::Named { path, args } = ty else {
            return Err(SerialError::UnknownRecord(ty.clone()));
        };
        let Some(spec) = self.record_spec(path) else {
            return Err(SerialError::UnknownRecord(ty.clone()));
        };
        let converter = self.converter(&spec, args)?;
        Ok(RecordClass::new(converter))
    }

    /// Returns the number of converters compiled so far.
    #[inline]
    pub fn compiled_count(&self) -> usize {
        self.cache.len()
    }

    /// Returns the cached converter of `spec` applied to `args`,
    /// compiling and publishing it on a miss.
    pub(crate) fn converter(
        &self,
        spec: &Arc<RecordSpec>,
        args: &[TypeExpr],
    ) -> SerialResult<Arc<CompiledConverter>> {
        let key = TypeExpr::generic(&spec.path, args.iter().cloned());
        if let Some(converter) = self.cache.get(&key) {
            return Ok(converter);
        }
        let converter = CompiledConverter::compile(self, spec.clone(), args.to_vec())?;
        Ok(self.cache.publish(converter))
    }

    /// Runs `f` with a resolver over the current tables, holding the
    /// read lock for the duration of the call.
    pub(crate) fn with_resolver<R>(&self, f: impl FnOnce(&Resolver<'_>) -> R) -> R {
        let tables = self.read();
        f(&Resolver::new(&tables, &[]))
    }
}

// -----------------------------------------------------------------------------
// Tests
