use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use super::decl::{FieldDecl, RecordDecl};
use super::merge::merge;
use super::registry::Tables;
use super::spec::{FieldSpec, RecordSpec};
use crate::error::{SerialError, SerialResult, UnserializableField};
use crate::hash::HashSet;
use crate::types::{Resolver, SCHEMA_MODULE, TypeExpr};

// -----------------------------------------------------------------------------
// Names

fn is_ident(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Checks that `path` can name a user declared type.
pub(crate) fn check_path(path: &str) -> SerialResult<()> {
    if path.is_empty() {
        return Err(SerialError::invalid(path, "the path is empty"));
    }
    if !path.split("::").all(is_ident) {
        return Err(SerialError::invalid(path, "the path is not a `::` separated identifier list"));
    }
    if path == SCHEMA_MODULE || path.split("::").next() == Some(SCHEMA_MODULE) {
        return Err(SerialError::invalid(
            path,
            format!("the `{SCHEMA_MODULE}` namespace is reserved for built-in types"),
        ));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Field Spec Builder

/// Builds the finalized spec of `decl` against the registered tables.
pub(crate) fn build_spec(tables: &Tables, decl: RecordDecl) -> SerialResult<RecordSpec> {
    let RecordDecl {
        path,
        type_params,
        bases,
        fields,
        capabilities,
        fixed_attributes,
        omit_none,
        forbid_extra_keys,
        eager,
    } = decl;

    check_path(&path)?;
    if tables.contains_path(&path) {
        return Err(SerialError::invalid(&path, "the path is already declared"));
    }

    let type_params = check_type_params(&path, type_params)?;
    let record: Arc<str> = Arc::from(path.as_str());
    let record_ty = TypeExpr::generic(
        &path,
        type_params.iter().map(|p| TypeExpr::Param(p.clone())),
    );
    let resolver = Resolver::new(tables, &type_params);

    // inherited

    let mut capabilities = capabilities;
    let mut ancestors: Vec<Arc<str>> = Vec::new();
    let mut inherited = Vec::with_capacity(bases.len());

    for base in &bases {
        let TypeExpr::Named { path: base_path, args } = base else {
            return Err(SerialError::invalid(&path, format!("type parameter `{base}` used as a base")));
        };
        let Some(spec) = tables.records.get(&**base_path) else {
            return Err(SerialError::UnknownRecord(base.clone()));
        };
        if args.len() != spec.type_params.len() {
            return Err(SerialError::TypeArguments {
                path: String::from(&**base_path),
                expected: spec.type_params.len(),
                found: args.len(),
            });
        }
        for arg in args {
            resolver
                .resolve(arg)
                .map_err(|err| SerialError::invalid(&path, format!("base `{base}`: {err}")))?;
        }

        for ancestor in core::iter::once(&spec.path).chain(&spec.ancestors) {
            if !ancestors.contains(ancestor) {
                ancestors.push(ancestor.clone());
            }
        }
        capabilities |= spec.capabilities;

        let mut base_fields = Vec::with_capacity(spec.fields.len());
        for field in &spec.fields {
            if args.is_empty() {
                base_fields.push(field.clone());
                continue;
            }
            let ty = field.ty.substitute(&spec.type_params, args);
            let descriptor = resolver
                .resolve(&ty)
                .map_err(|err| unserializable(&field.name, &ty, &record_ty, err.reason_for(&ty)))?;
            base_fields.push(FieldSpec {
                ty,
                descriptor,
                ..field.clone()
            });
        }
        inherited.push(base_fields);
    }

    // own

    {
        let mut seen: HashSet<&str> = HashSet::default();
        for field in &fields {
            if !is_ident(&field.name) {
                return Err(SerialError::invalid(
                    &path,
                    format!("`{}` is not a valid field name", field.name),
                ));
            }
            if !seen.insert(&field.name) {
                return Err(SerialError::invalid(
                    &path,
                    format!("field `{}` is declared twice", field.name),
                ));
            }
        }
    }

    let own = fields
        .into_iter()
        .map(|field| build_field(&resolver, &record, &record_ty, field))
        .collect::<SerialResult<Vec<_>>>()?;

    let fields = merge(&path, inherited, own)?;

    {
        let mut aliases: HashSet<&str> = HashSet::default();
        for field in &fields {
            if !aliases.insert(&field.alias) {
                return Err(SerialError::invalid(
                    &path,
                    format!("plain-data key `{}` is used by two fields", field.alias),
                ));
            }
        }
    }

    Ok(RecordSpec {
        path: record,
        type_params,
        fields,
        ancestors,
        capabilities,
        fixed_attributes,
        omit_none,
        forbid_extra_keys,
        eager,
    })
}

fn check_type_params(path: &str, params: Vec<String>) -> SerialResult<Vec<Arc<str>>> {
    let mut output: Vec<Arc<str>> = Vec::with_capacity(params.len());
    for param in params {
        let reserved = matches!(param.parse::<TypeExpr>(), Ok(ref ty) if !ty.is_param());
        if !is_ident(&param) || reserved {
            return Err(SerialError::invalid(
                path,
                format!("`{param}` cannot name a type parameter"),
            ));
        }
        if output.iter().any(|p| **p == *param) {
            return Err(SerialError::invalid(
                path,
                format!("type parameter `{param}` is declared twice"),
            ));
        }
        output.push(Arc::from(param));
    }
    Ok(output)
}

fn build_field(
    resolver: &Resolver<'_>,
    record: &Arc<str>,
    record_ty: &TypeExpr,
    field: FieldDecl,
) -> SerialResult<FieldSpec> {
    let FieldDecl {
        name,
        ty,
        default,
        alias,
        omit_if_default,
        pack,
        unpack,
    } = field;

    let descriptor = resolver
        .resolve(&ty)
        .map_err(|err| unserializable(&name, &ty, record_ty, err.reason_for(&ty)))?;

    let name: Arc<str> = Arc::from(name);
    let alias = match alias {
        Some(alias) => Arc::from(alias),
        None => name.clone(),
    };

    Ok(FieldSpec {
        name,
        ty,
        descriptor,
        default,
        alias,
        omit_if_default,
        pack,
        unpack,
        origin: record.clone(),
    })
}

fn unserializable(
    name: &str,
    ty: &TypeExpr,
    holder: &TypeExpr,
    reason: Option<String>,
) -> SerialError {
    let err = UnserializableField::new(name, ty.clone(), holder.clone());
    match reason {
        Some(reason) => err.with_message(reason).into(),
        None => err.into(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;

    use super::{build_spec, check_path};
    use crate::error::SerialError;
    use crate::schema::{FieldDecl, RecordDecl, Tables};
    use crate::types::TypeExpr;

    #[test]
    fn record_paths() {
        assert!(check_path("app::Point").is_ok());
        assert!(check_path("Point").is_ok());
        assert!(check_path("").is_err());
        assert!(check_path("app::").is_err());
        assert!(check_path("app::List<int>").is_err());
        assert!(check_path("schema::Point").is_err());
        assert!(check_path("schema").is_err());
    }

    #[test]
    fn names_and_keys_are_unique() {
        let mut tables = Tables::default();
        let base = build_spec(
            &tables,
            RecordDecl::new("app::Base").field(FieldDecl::new("id", TypeExpr::int()).alias("key")),
        )
        .unwrap();
        tables.records.insert(Arc::from("app::Base"), Arc::new(base));

        let spec = build_spec(
            &tables,
            RecordDecl::new("app::Item")
                .extends(TypeExpr::named("app::Base"))
                .field(FieldDecl::new("name", TypeExpr::str())),
        )
        .unwrap();
        assert_eq!(spec.fields().len(), 2);

        let clash = build_spec(
            &tables,
            RecordDecl::new("app::Clash")
                .extends(TypeExpr::named("app::Base"))
                .field(FieldDecl::new("other", TypeExpr::str()).alias("key")),
        )
        .unwrap_err();
        assert_eq!(
            clash.to_string(),
            "invalid declaration of `app::Clash`: plain-data key `key` is used by two fields"
        );

        let bad = build_spec(&tables, RecordDecl::new("app::Bad").field(FieldDecl::new("1x", TypeExpr::int())));
        assert!(matches!(bad, Err(SerialError::InvalidDeclaration { .. })));
    }
}
