//! Type tags carried by every runtime value.

/// Identifies the type of a [`Value`](crate::Value).
///
/// Binary operations compare tags before anything else; there is no
/// implicit conversion between tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// Signed 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// Unicode text.
    String,
    /// A type name used as an operand (only `int`, `bool` or `string`).
    Type,
}

/// All type tags, in definition order.
pub const ALL_TYPE_TAGS: [TypeTag; 4] = [
    TypeTag::Int,
    TypeTag::Bool,
    TypeTag::String,
    TypeTag::Type,
];

impl TypeTag {
    /// Returns the source-level name of this tag.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Bool => "bool",
            TypeTag::String => "string",
            TypeTag::Type => "type",
        }
    }

    /// Resolve the payload of a `type` operand. `type` itself is not a
    /// readable type and is rejected.
    pub fn from_type_literal(text: &str) -> Option<TypeTag> {
        match text {
            "int" => Some(TypeTag::Int),
            "bool" => Some(TypeTag::Bool),
            "string" => Some(TypeTag::String),
            _ => None,
        }
    }
}
