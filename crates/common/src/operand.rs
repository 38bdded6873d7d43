//! Instruction operands and the operand kinds opcodes demand.

use std::fmt;

use crate::lexical;
use crate::type_tag::TypeTag;
use crate::value::Value;

/// The value of an argument element's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    Var,
    Label,
    Int,
    Bool,
    String,
    Type,
}

/// All argument types, in definition order.
pub const ALL_ARG_TYPES: [ArgType; 6] = [
    ArgType::Var,
    ArgType::Label,
    ArgType::Int,
    ArgType::Bool,
    ArgType::String,
    ArgType::Type,
];

impl ArgType {
    /// Attribute spelling of this argument type.
    pub fn name(&self) -> &'static str {
        match self {
            ArgType::Var => "var",
            ArgType::Label => "label",
            ArgType::Int => "int",
            ArgType::Bool => "bool",
            ArgType::String => "string",
            ArgType::Type => "type",
        }
    }

    /// Look up an attribute spelling. Case-sensitive.
    pub fn from_name(name: &str) -> Option<ArgType> {
        ALL_ARG_TYPES.iter().find(|t| t.name() == name).copied()
    }

    /// The value tag produced by a literal of this type, if it is a literal.
    pub fn literal_tag(&self) -> Option<TypeTag> {
        match self {
            ArgType::Int => Some(TypeTag::Int),
            ArgType::Bool => Some(TypeTag::Bool),
            ArgType::String => Some(TypeTag::String),
            ArgType::Type => Some(TypeTag::Type),
            ArgType::Var | ArgType::Label => None,
        }
    }
}

/// What an opcode requires at one operand position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// Must be a variable (a write target).
    Var,
    /// Variable or any int/bool/string literal.
    Symb,
    /// A label name.
    Label,
    /// Variable or int literal.
    Int,
    /// Variable or bool literal.
    Bool,
    /// Variable or string literal.
    Str,
    /// A type name.
    Type,
}

impl OperandKind {
    /// Argument types accepted at a position of this kind.
    pub fn accepted(&self) -> &'static [ArgType] {
        match self {
            OperandKind::Var => &[ArgType::Var],
            OperandKind::Symb => &[ArgType::Var, ArgType::Int, ArgType::Bool, ArgType::String],
            OperandKind::Label => &[ArgType::Label],
            OperandKind::Int => &[ArgType::Var, ArgType::Int],
            OperandKind::Bool => &[ArgType::Var, ArgType::Bool],
            OperandKind::Str => &[ArgType::Var, ArgType::String],
            OperandKind::Type => &[ArgType::Type],
        }
    }

    /// Returns true if `arg_type` may appear at a position of this kind.
    pub fn accepts(&self, arg_type: ArgType) -> bool {
        self.accepted().contains(&arg_type)
    }
}

/// Which frame a variable reference addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTag {
    /// `GF`: the global frame.
    Global,
    /// `LF`: the top of the local frame stack.
    Local,
    /// `TF`: the pending temporary frame.
    Temporary,
}

impl FrameTag {
    /// Source prefix of this frame.
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameTag::Global => "GF",
            FrameTag::Local => "LF",
            FrameTag::Temporary => "TF",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<FrameTag> {
        match prefix {
            "GF" => Some(FrameTag::Global),
            "LF" => Some(FrameTag::Local),
            "TF" => Some(FrameTag::Temporary),
            _ => None,
        }
    }
}

/// A reference to a variable slot, resolved against the frames at use time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub frame: FrameTag,
    pub name: String,
}

impl VarRef {
    pub fn new(frame: FrameTag, name: impl Into<String>) -> Self {
        Self {
            frame,
            name: name.into(),
        }
    }

    /// Parse `FRAME@identifier`.
    pub fn parse(text: &str) -> Option<VarRef> {
        let (prefix, name) = text.split_once('@')?;
        let frame = FrameTag::from_prefix(prefix)?;
        if !lexical::is_identifier(name) {
            return None;
        }
        Some(VarRef::new(frame, name))
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame.prefix(), self.name)
    }
}

/// A single instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Variable reference, looked up on every use.
    Var(VarRef),
    /// Constant fixed at load time.
    Literal(Value),
    /// Jump target, resolved against the label table on use.
    Label(String),
}

/// Renders the operand in source form (`GF@x`, `int@5`, `string@a\032b`).
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(var) => write!(f, "{var}"),
            Operand::Label(name) => f.write_str(name),
            Operand::Literal(Value::Str(s)) => {
                write!(f, "string@{}", lexical::encode_escapes(s))
            }
            Operand::Literal(Value::Type(t)) => f.write_str(t.name()),
            Operand::Literal(v) => write!(f, "{}@{v}", v.type_tag().name()),
        }
    }
}
