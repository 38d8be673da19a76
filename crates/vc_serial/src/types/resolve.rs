use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use thiserror::Error;

use super::descriptor::{ScalarKind, TypeDescriptor};
use super::expr::{self, TypeExpr};
use crate::error::Reason;
use crate::schema::Tables;

// -----------------------------------------------------------------------------
// ResolveError

/// Error returned when a type expression has no descriptor.
///
/// `reason` is `None` when nothing is known about the type at all,
/// i.e. it is neither built in nor declared nor backed by a custom codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{ty}` cannot be resolved{}", Reason(.reason))]
pub struct ResolveError {
    pub ty: TypeExpr,
    pub reason: Option<String>,
}

impl ResolveError {
    #[inline]
    fn unknown(ty: &TypeExpr) -> Self {
        Self {
            ty: ty.clone(),
            reason: None,
        }
    }

    #[inline]
    fn because(ty: &TypeExpr, reason: String) -> Self {
        Self {
            ty: ty.clone(),
            reason: Some(reason),
        }
    }

    /// Returns the reason to report for a field declared as `field_type`.
    ///
    /// A failure deeper inside the field type always names the part
    /// that could not be resolved.
    pub(crate) fn reason_for(self, field_type: &TypeExpr) -> Option<String> {
        match self.reason {
            Some(reason) => Some(reason),
            None if self.ty != *field_type => {
                Some(format!("`{}` has no descriptor or custom codec", self.ty))
            }
            None => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Resolver

/// Turns type expressions into descriptors against a snapshot of the
/// declaration tables.
///
/// `params` are the type parameters in scope, those of the generic
/// record being declared. Everything else must already be registered.
pub(crate) struct Resolver<'a> {
    tables: &'a Tables,
    params: &'a [Arc<str>],
}

impl<'a> Resolver<'a> {
    #[inline]
    pub fn new(tables: &'a Tables, params: &'a [Arc<str>]) -> Self {
        Self { tables, params }
    }

    pub fn resolve(&self, ty: &TypeExpr) -> Result<TypeDescriptor, ResolveError> {
        match ty {
            TypeExpr::Param(name) => {
                if self.params.contains(name) {
                    Ok(TypeDescriptor::Param(name.clone()))
                } else {
                    Err(ResolveError::because(
                        ty,
                        format!("unknown type parameter `{name}`"),
                    ))
                }
            }
            TypeExpr::Named { path, args } => self.resolve_named(ty, path, args),
        }
    }

    fn resolve_all(&self, args: &[TypeExpr]) -> Result<Vec<TypeDescriptor>, ResolveError> {
        args.iter().map(|arg| self.resolve(arg)).collect()
    }

    fn resolve_named(
        &self,
        ty: &TypeExpr,
        path: &str,
        args: &[TypeExpr],
    ) -> Result<TypeDescriptor, ResolveError> {
        if let Some(kind) = ScalarKind::from_path(path) {
            check_arity(ty, path, args, 0)?;
            return Ok(TypeDescriptor::Scalar(kind));
        }

        match path {
            expr::OBJECT => return Err(ResolveError::unknown(ty)),
            expr::OPTIONAL => {
                check_arity(ty, path, args, 1)?;
                let inner = self.resolve(&args[0])?;
                return Ok(TypeDescriptor::Optional(Box::new(inner)));
            }
            expr::UNION => {
                if args.is_empty() {
                    return Err(ResolveError::because(
                        ty,
                        format!("`{path}` needs at least one alternative"),
                    ));
                }
                return Ok(TypeDescriptor::Union(self.resolve_all(args)?));
            }
            expr::LIST => {
                check_arity(ty, path, args, 1)?;
                let item = self.resolve(&args[0])?;
                return Ok(TypeDescriptor::Sequence(Box::new(item)));
            }
            expr::DICT => {
                check_arity(ty, path, args, 2)?;
                let key = self.resolve(&args[0])?;
                if !key.is_mapping_key() && !matches!(key, TypeDescriptor::Param(_)) {
                    return Err(ResolveError::because(
                        ty,
                        format!("`{}` cannot be used as a mapping key", args[0]),
                    ));
                }
                let value = self.resolve(&args[1])?;
                return Ok(TypeDescriptor::Mapping(Box::new(key), Box::new(value)));
            }
            expr::TUPLE => return Ok(TypeDescriptor::Tuple(self.resolve_all(args)?)),
            _ => {}
        }

        if let Some(spec) = self.tables.records.get(path) {
            let expected = spec.type_params().len();
            check_arity(ty, path, args, expected)?;
            if expected == 0 {
                return Ok(TypeDescriptor::NestedRecord(spec.clone()));
            }
            self.resolve_all(args)?;
            return Ok(TypeDescriptor::Generic(spec.clone(), args.to_vec()));
        }

        if let Some(enum_type) = self.tables.enums.get(path) {
            check_arity(ty, path, args, 0)?;
            return Ok(TypeDescriptor::Enum(enum_type.clone()));
        }

        match self.tables.codecs.get(ty) {
            Some(codec) => Ok(TypeDescriptor::Custom(codec.clone())),
            None => Err(ResolveError::unknown(ty)),
        }
    }
}

fn check_arity(
    ty: &TypeExpr,
    path: &str,
    args: &[TypeExpr],
    expected: usize,
) -> Result<(), ResolveError> {
    if args.len() == expected {
        return Ok(());
    }
    let plural = if expected == 1 { "" } else { "s" };
    Err(ResolveError::because(
        ty,
        format!(
            "`{}` expects {expected} type argument{plural}, found {}",
            TypeExpr::named(path),
            args.len()
        ),
    ))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;

    use super::Resolver;
    use crate::schema::Tables;
    use crate::types::{ScalarKind, TypeDescriptor, TypeExpr};

    fn resolve(ty: &str) -> Result<TypeDescriptor, super::ResolveError> {
        let tables = Tables::default();
        let params = [Arc::<str>::from("T")];
        Resolver::new(&tables, &params).resolve(&ty.parse().unwrap())
    }

    #[test]
    fn builtin_shapes() {
        assert!(matches!(
            resolve("int").unwrap(),
            TypeDescriptor::Scalar(ScalarKind::Int)
        ));
        assert!(matches!(
            resolve("Dict<int, List<T>>").unwrap(),
            TypeDescriptor::Mapping(..)
        ));
        assert_eq!(
            resolve("Tuple<str, Optional<bytes>>").unwrap().type_expr().to_string(),
            "schema.Tuple[str, schema.Optional[bytes]]"
        );
    }

    #[test]
    fn arity_and_key_errors() {
        let err = resolve("List<int, str>").unwrap_err();
        assert_eq!(
            err.reason.as_deref(),
            Some("`schema.List` expects 1 type argument, found 2")
        );

        let err = resolve("Dict<List<int>, int>").unwrap_err();
        assert_eq!(
            err.reason.as_deref(),
            Some("`schema.List[int]` cannot be used as a mapping key")
        );

        let err = resolve("int<str>").unwrap_err();
        assert!(err.reason.is_some());
    }

    #[test]
    fn unknown_types() {
        let object = resolve("object").unwrap_err();
        assert_eq!(object.reason, None);
        assert_eq!(object.to_string(), "`schema.object` cannot be resolved");

        let nested = resolve("List<app::Missing>").unwrap_err();
        assert_eq!(nested.ty, TypeExpr::named("app::Missing"));
        assert_eq!(
            nested.reason_for(&TypeExpr::list(TypeExpr::named("app::Missing"))).as_deref(),
            Some("`app.Missing` has no descriptor or custom codec")
        );

        let param = resolve("U").unwrap_err();
        assert_eq!(param.reason.as_deref(), Some("unknown type parameter `U`"));
    }
}
