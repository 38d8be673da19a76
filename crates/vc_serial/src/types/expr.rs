use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Built-in paths

/// Namespace of the built-in types.
pub const SCHEMA_MODULE: &str = "schema";

pub(crate) const NONE: &str = "schema::none";
pub(crate) const BOOL: &str = "schema::bool";
pub(crate) const INT: &str = "schema::int";
pub(crate) const FLOAT: &str = "schema::float";
pub(crate) const STR: &str = "schema::str";
pub(crate) const BYTES: &str = "schema::bytes";
pub(crate) const OBJECT: &str = "schema::object";
pub(crate) const OPTIONAL: &str = "schema::Optional";
pub(crate) const UNION: &str = "schema::Union";
pub(crate) const LIST: &str = "schema::List";
pub(crate) const DICT: &str = "schema::Dict";
pub(crate) const TUPLE: &str = "schema::Tuple";

pub(crate) const SCALAR_PATHS: [&str; 6] = [NONE, BOOL, INT, FLOAT, STR, BYTES];
pub(crate) const BUILTIN_PATHS: [&str; 12] = [
    NONE, BOOL, INT, FLOAT, STR, BYTES, OBJECT, OPTIONAL, UNION, LIST, DICT, TUPLE,
];

// -----------------------------------------------------------------------------
// TypeExpr

/// A declared type expression.
///
/// Either a named type with optional type arguments, or a type parameter
/// of the generic record being declared. Paths are written with `::`
/// separators and never start with `::`.
///
/// The [`Display`](fmt::Display) output is the canonical name used by
/// every diagnostic: paths render dot-separated, type arguments go in
/// brackets and built-in scalar arguments render by their bare name.
///
/// # Examples
///
/// ```
/// use vc_serial::TypeExpr;
///
/// let ty = TypeExpr::list(TypeExpr::int());
///
/// assert_eq!(TypeExpr::int().canonical_name(), "schema.int");
/// assert_eq!(ty.canonical_name(), "schema.List[int]");
/// assert_eq!(ty.type_ident(), "List");
/// assert_eq!(ty.module_path(), Some("schema"));
///
/// let pair = TypeExpr::generic("app::Pair", [TypeExpr::named("app::Point")]);
/// assert_eq!(pair.to_string(), "app.Pair[app.Point]");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Named { path: Arc<str>, args: Vec<TypeExpr> },
    Param(Arc<str>),
}

impl TypeExpr {
    /// A named type without type arguments.
    #[inline]
    pub fn named(path: &str) -> Self {
        Self::Named {
            path: Arc::from(path),
            args: Vec::new(),
        }
    }

    /// A named type applied to type arguments.
    pub fn generic<I: IntoIterator<Item = TypeExpr>>(path: &str, args: I) -> Self {
        Self::Named {
            path: Arc::from(path),
            args: args.into_iter().collect(),
        }
    }

    /// A type parameter of the enclosing generic record.
    #[inline]
    pub fn param(name: &str) -> Self {
        Self::Param(Arc::from(name))
    }

    #[inline]
    pub fn none() -> Self {
        Self::named(NONE)
    }

    #[inline]
    pub fn bool() -> Self {
        Self::named(BOOL)
    }

    #[inline]
    pub fn int() -> Self {
        Self::named(INT)
    }

    #[inline]
    pub fn float() -> Self {
        Self::named(FLOAT)
    }

    #[inline]
    pub fn str() -> Self {
        Self::named(STR)
    }

    #[inline]
    pub fn bytes() -> Self {
        Self::named(BYTES)
    }

    /// The opaque top type, it never resolves to a descriptor.
    #[inline]
    pub fn object() -> Self {
        Self::named(OBJECT)
    }

    #[inline]
    pub fn optional(inner: TypeExpr) -> Self {
        Self::generic(OPTIONAL, [inner])
    }

    #[inline]
    pub fn union<I: IntoIterator<Item = TypeExpr>>(alternatives: I) -> Self {
        Self::generic(UNION, alternatives)
    }

    #[inline]
    pub fn list(item: TypeExpr) -> Self {
        Self::generic(LIST, [item])
    }

    #[inline]
    pub fn dict(key: TypeExpr, value: TypeExpr) -> Self {
        Self::generic(DICT, [key, value])
    }

    #[inline]
    pub fn tuple<I: IntoIterator<Item = TypeExpr>>(items: I) -> Self {
        Self::generic(TUPLE, items)
    }

    /// Returns the full path without arguments, `None` for a type parameter.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Named { path, .. } => Some(path),
            Self::Param(_) => None,
        }
    }

    /// Returns the type arguments, empty for plain types and parameters.
    #[inline]
    pub fn args(&self) -> &[TypeExpr] {
        match self {
            Self::Named { args, .. } => args,
            Self::Param(_) => &[],
        }
    }

    #[inline]
    pub const fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }

    /// Returns the short name of the type, without arguments and module path.
    ///
    /// For a type parameter this is the parameter name.
    pub fn type_ident(&self) -> &str {
        match self {
            Self::Named { path, .. } => match path.rsplit_once("::") {
                Some((_, ident)) => ident,
                None => path,
            },
            Self::Param(name) => name,
        }
    }

    /// Returns the module path, if the type has one.
    pub fn module_path(&self) -> Option<&str> {
        let (module, _) = self.path()?.rsplit_once("::")?;
        Some(module)
    }

    /// Returns the type name with arguments but without module path,
    /// e.g. `Pair[int]`.
    pub fn type_name(&self) -> String {
        use fmt::Write;

        let mut output = String::from(self.type_ident());
        if !self.args().is_empty() {
            let _ = write!(output, "[{}]", ArgList(self.args()));
        }
        output
    }

    /// Returns the canonical name, the same as the `Display` output.
    #[inline]
    pub fn canonical_name(&self) -> String {
        alloc::format!("{self}")
    }

    /// Whether this is a built-in scalar (`schema::int`, ...).
    pub fn is_builtin_scalar(&self) -> bool {
        match self {
            Self::Named { path, args } => args.is_empty() && SCALAR_PATHS.contains(&&**path),
            Self::Param(_) => false,
        }
    }

    /// Whether any type parameter occurs in this expression.
    pub fn has_params(&self) -> bool {
        match self {
            Self::Named { args, .. } => args.iter().any(Self::has_params),
            Self::Param(_) => true,
        }
    }

    /// Replaces each occurrence of `params[i]` with `args[i]`.
    ///
    /// Parameters without a counterpart are left untouched.
    pub fn substitute(&self, params: &[Arc<str>], args: &[TypeExpr]) -> TypeExpr {
        match self {
            Self::Named { path, args: inner } => Self::Named {
                path: path.clone(),
                args: inner.iter().map(|t| t.substitute(params, args)).collect(),
            },
            Self::Param(name) => match params.iter().position(|p| p == name) {
                Some(index) if index < args.len() => args[index].clone(),
                _ => self.clone(),
            },
        }
    }

    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_builtin_scalar() {
            f.write_str(self.type_ident())
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

struct ArgList<'a>(&'a [TypeExpr]);

impl fmt::Display for ArgList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, arg) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            arg.fmt_arg(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { path, args } => {
                let mut segments = path.split("::");
                if let Some(first) = segments.next() {
                    f.write_str(first)?;
                }
                for segment in segments {
                    write!(f, ".{segment}")?;
                }
                if !args.is_empty() {
                    write!(f, "[{}]", ArgList(args))?;
                }
                Ok(())
            }
            Self::Param(name) => f.write_str(name),
        }
    }
}

/// This implementation only outputs the canonical name.
impl fmt::Debug for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeExpr;
    use alloc::sync::Arc;

    #[test]
    fn canonical_names() {
        assert_eq!(TypeExpr::int().canonical_name(), "schema.int");
        assert_eq!(TypeExpr::object().canonical_name(), "schema.object");
        assert_eq!(
            TypeExpr::list(TypeExpr::int()).canonical_name(),
            "schema.List[int]"
        );
        assert_eq!(
            TypeExpr::dict(TypeExpr::str(), TypeExpr::list(TypeExpr::named("app::Point")))
                .canonical_name(),
            "schema.Dict[str, schema.List[app.Point]]"
        );
        assert_eq!(
            TypeExpr::generic("app::Pair", [TypeExpr::param("T")]).canonical_name(),
            "app.Pair[T]"
        );
        assert_eq!(
            TypeExpr::generic("app::geo::Pair", [TypeExpr::float()]).canonical_name(),
            "app.geo.Pair[float]"
        );
    }

    #[test]
    fn names_and_paths() {
        let ty = TypeExpr::generic("app::geo::Pair", [TypeExpr::float()]);
        assert_eq!(ty.type_ident(), "Pair");
        assert_eq!(ty.type_name(), "Pair[float]");
        assert_eq!(ty.module_path(), Some("app::geo"));
        assert_eq!(TypeExpr::named("Local").module_path(), None);
        assert_eq!(TypeExpr::param("T").type_ident(), "T");
    }

    #[test]
    fn substitute_params() {
        let params = [Arc::<str>::from("K"), Arc::<str>::from("V")];
        let ty = TypeExpr::dict(TypeExpr::param("K"), TypeExpr::list(TypeExpr::param("V")));
        let out = ty.substitute(&params, &[TypeExpr::str(), TypeExpr::int()]);

        assert_eq!(out, TypeExpr::dict(TypeExpr::str(), TypeExpr::list(TypeExpr::int())));
        assert!(ty.has_params());
        assert!(!out.has_params());
    }
}
