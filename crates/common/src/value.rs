//! Runtime value representation.
//!
//! Values are immutable; every operation produces a new one.

use std::cmp::Ordering;
use std::fmt;

use crate::error::LexError;
use crate::lexical;
use crate::type_tag::TypeTag;

/// A tagged runtime value.
///
/// A declared-but-unassigned variable holds no `Value` at all; frames model
/// that state as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Unicode text with escapes already decoded.
    Str(String),
    /// A type name (`int`, `bool` or `string`).
    Type(TypeTag),
}

impl Value {
    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::String,
            Value::Type(_) => TypeTag::Type,
        }
    }

    /// Build a value from its declared type and literal text.
    ///
    /// String literals are checked against the string grammar and then have
    /// their `\ddd` escapes decoded.
    pub fn parse(tag: TypeTag, text: &str) -> Result<Value, LexError> {
        match tag {
            TypeTag::Int => lexical::parse_int(text).map(Value::Int),
            TypeTag::Bool => lexical::parse_bool(text).map(Value::Bool),
            TypeTag::String => {
                lexical::check_string(text)?;
                Ok(Value::Str(lexical::decode_escapes(text)))
            }
            TypeTag::Type => TypeTag::from_type_literal(text)
                .map(Value::Type)
                .ok_or_else(|| LexError::Malformed {
                    expected: "type",
                    text: text.to_string(),
                }),
        }
    }
}

// Values of different tags are unordered, so `partial_cmp` returns `None`
// exactly when `eq` would compare across tags.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Type(a), Value::Type(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Renders the value the way WRITE emits it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Type(t) => f.write_str(t.name()),
        }
    }
}
