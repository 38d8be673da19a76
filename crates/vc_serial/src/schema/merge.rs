//! Inheritance merge of field lists.
//!
//! Bases contribute their finalized fields left to right. A name seen
//! twice keeps its first position and spec, so the leftmost base wins.
//! The record's own fields then replace inherited fields in place, or
//! are appended when new.
//!
//! Two bases giving one name different types is ambiguous unless the
//! record declares the field itself.

use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use super::spec::FieldSpec;
use crate::error::{SerialError, SerialResult};

pub(crate) fn merge(
    record: &str,
    inherited: Vec<Vec<FieldSpec>>,
    own: Vec<FieldSpec>,
) -> SerialResult<Vec<FieldSpec>> {
    let mut fields: Vec<FieldSpec> = Vec::new();
    let mut conflicts: Vec<(Arc<str>, SerialError)> = Vec::new();

    for base_fields in inherited {
        for field in base_fields {
            let Some(kept) = fields.iter().find(|kept| kept.name == field.name) else {
                fields.push(field);
                continue;
            };
            if kept.ty != field.ty {
                let reason = format!(
                    "field `{}` is inherited as {} from `{}` and as {} from `{}`",
                    field.name, kept.ty, kept.origin, field.ty, field.origin,
                );
                conflicts.push((field.name.clone(), SerialError::invalid(record, reason)));
            } else if kept.origin != field.origin {
                log::debug!(
                    "`{record}` inherits field `{}` from `{}` and `{}`, keeping the first",
                    field.name,
                    kept.origin,
                    field.origin,
                );
            }
        }
    }

    if let Some((_, err)) = conflicts
        .into_iter()
        .find(|(name, _)| !own.iter().any(|field| field.name == *name))
    {
        return Err(err);
    }

    for field in own {
        match fields.iter_mut().find(|slot| slot.name == field.name) {
            Some(slot) => *slot = field,
            None => fields.push(field),
        }
    }

    Ok(fields)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::merge;
    use crate::data::Data;
    use crate::error::SerialError;
    use crate::schema::spec::FieldSpec;
    use crate::types::{ScalarKind, TypeDescriptor, TypeExpr};

    fn field(name: &str, kind: ScalarKind, origin: &str) -> FieldSpec {
        FieldSpec {
            name: Arc::from(name),
            ty: kind.type_expr(),
            descriptor: TypeDescriptor::Scalar(kind),
            default: None,
            alias: Arc::from(name),
            omit_if_default: false,
            pack: None,
            unpack: None,
            origin: Arc::from(origin),
        }
    }

    fn names(fields: &[FieldSpec]) -> Vec<&str> {
        fields.iter().map(FieldSpec::name).collect()
    }

    #[test]
    fn descendant_appends() {
        let fields = merge(
            "app::B",
            vec![vec![field("x", ScalarKind::Int, "app::A")]],
            vec![field("y", ScalarKind::Int, "app::B")],
        )
        .unwrap();
        assert_eq!(names(&fields), ["x", "y"]);
    }

    #[test]
    fn override_keeps_position() {
        let mut replaced = field("x", ScalarKind::Float, "app::B");
        replaced.default = Some(Data::Float(0.5));

        let fields = merge(
            "app::B",
            vec![vec![
                field("x", ScalarKind::Int, "app::A"),
                field("y", ScalarKind::Int, "app::A"),
            ]],
            vec![field("z", ScalarKind::Str, "app::B"), replaced],
        )
        .unwrap();

        assert_eq!(names(&fields), ["x", "y", "z"]);
        assert_eq!(fields[0].ty(), &TypeExpr::float());
        assert_eq!(fields[0].origin(), "app::B");
        assert_eq!(fields[0].default(), Some(&Data::Float(0.5)));
    }

    #[test]
    fn leftmost_base_wins() {
        let fields = merge(
            "app::C",
            vec![
                vec![field("x", ScalarKind::Int, "app::A"), field("a", ScalarKind::Int, "app::A")],
                vec![field("b", ScalarKind::Int, "app::B"), field("x", ScalarKind::Int, "app::B")],
            ],
            vec![],
        )
        .unwrap();

        assert_eq!(names(&fields), ["x", "a", "b"]);
        assert_eq!(fields[0].origin(), "app::A");
    }

    #[test]
    fn conflicting_bases() {
        let bases = || {
            vec![
                vec![field("x", ScalarKind::Int, "app::A")],
                vec![field("x", ScalarKind::Str, "app::B")],
            ]
        };

        let err = merge("app::C", bases(), vec![]).unwrap_err();
        assert!(matches!(err, SerialError::InvalidDeclaration { .. }));
        assert_eq!(
            err.to_string(),
            "invalid declaration of `app::C`: field `x` is inherited as schema.int \
             from `app::A` and as schema.str from `app::B`"
        );

        let fields = merge("app::C", bases(), vec![field("x", ScalarKind::Float, "app::C")]).unwrap();
        assert_eq!(names(&fields), ["x"]);
        assert_eq!(fields[0].ty(), &TypeExpr::float());
    }
}
