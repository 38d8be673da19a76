use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use thiserror::Error;

use super::expr::{BUILTIN_PATHS, SCHEMA_MODULE, TypeExpr};

/// Error returned when a type expression cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid type expression at offset {offset}: {message}")]
pub struct ParseTypeError {
    pub offset: usize,
    pub message: String,
}

/// Parses the textual form of a type expression.
///
/// A single identifier naming a built-in type (`int`, `List`, ...) resolves
/// into the `schema` namespace, any other single identifier is a type
/// parameter. Paths with `::` are taken as written.
///
/// # Examples
///
/// ```
/// use vc_serial::TypeExpr;
///
/// let ty: TypeExpr = "Dict<str, List<app::Point>>".parse().unwrap();
/// assert_eq!(
///     ty,
///     TypeExpr::dict(TypeExpr::str(), TypeExpr::list(TypeExpr::named("app::Point"))),
/// );
///
/// let param: TypeExpr = "T".parse().unwrap();
/// assert!(param.is_param());
/// ```
impl FromStr for TypeExpr {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input: s, offset: 0 };
        let expr = parser.expr()?;
        parser.skip_space();
        if parser.offset != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }
}

struct Parser<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: &str) -> ParseTypeError {
        ParseTypeError {
            offset: self.offset,
            message: String::from(message),
        }
    }

    fn rest(&self) -> &str {
        &self.input[self.offset..]
    }

    fn skip_space(&mut self) {
        let rest = self.rest();
        self.offset += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_space();
        if self.rest().starts_with(token) {
            self.offset += token.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&'a str, ParseTypeError> {
        self.skip_space();
        let input: &'a str = self.input;
        let start = self.offset;
        let bytes = input.as_bytes();
        let mut end = start;
        while end < bytes.len() && (bytes[end] == b'_' || bytes[end].is_ascii_alphanumeric()) {
            end += 1;
        }
        if end == start || bytes[start].is_ascii_digit() {
            return Err(self.error("expected an identifier"));
        }
        self.offset = end;
        Ok(&input[start..end])
    }

    fn expr(&mut self) -> Result<TypeExpr, ParseTypeError> {
        let mut segments: Vec<&'a str> = Vec::new();
        segments.push(self.ident()?);
        while self.eat("::") {
            segments.push(self.ident()?);
        }

        let mut args = Vec::new();
        if self.eat("<") {
            loop {
                args.push(self.expr()?);
                if self.eat(",") {
                    continue;
                }
                if self.eat(">") {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }

        let path = match segments.as_slice() {
            [single] => {
                let builtin = format!("{SCHEMA_MODULE}::{single}");
                if BUILTIN_PATHS.contains(&builtin.as_str()) {
                    builtin
                } else if args.is_empty() {
                    return Ok(TypeExpr::param(single));
                } else {
                    String::from(*single)
                }
            }
            _ => segments.join("::"),
        };

        Ok(TypeExpr::generic(&path, args))
    }
}

// -----------------------------------------------------------------------------
// Tests
