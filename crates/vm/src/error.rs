//! Runtime errors for the IPPcode18 VM.
//!
//! Handlers and the frame store raise a [`Fault`]; the execution loop
//! attaches the `order` of the instruction being executed exactly once,
//! producing a [`RuntimeError`].

use ippcode_common::{ErrorKind, FrameTag, Order, TypeTag};
use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    // --- Invalid operand ---
    /// Two operands that must share a tag do not.
    #[error("invalid operand - {opcode} operands differ in type ({left} and {right})")]
    TypeMismatch {
        opcode: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// An operand does not carry the tag its position requires.
    #[error("invalid operand - {opcode} expects {expected}, found {found}")]
    WrongType {
        opcode: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Integer result does not fit in 64 bits.
    #[error("invalid operand - integer overflow in {opcode}")]
    Overflow { opcode: &'static str },

    // --- Frames and variables ---
    /// Variable was never declared in its frame.
    #[error("undefined variable - {var}")]
    UndefinedVariable { var: String },

    /// The addressed frame does not exist.
    #[error("undefined frame - {} is not defined", .0.prefix())]
    UndefinedFrame(FrameTag),

    /// DEFVAR on a name already declared in the frame.
    #[error("semantic error - redefinition of variable {var}")]
    Redefinition { var: String },

    /// Jump or call to a label that is not in the label table.
    #[error("semantic error - undefined label '{0}'")]
    UndefinedLabel(String),

    // --- Missing value ---
    /// A declared variable was read before any assignment.
    #[error("missing value - variable {var} has no value")]
    Unassigned { var: String },

    /// RETURN with an empty call stack.
    #[error("missing value - call stack is empty")]
    EmptyCallStack,

    /// POPS with an empty data stack.
    #[error("missing value - data stack is empty")]
    EmptyDataStack,

    // --- Arithmetic ---
    #[error("division by zero")]
    DivisionByZero,

    // --- Strings ---
    /// Index outside the string.
    #[error("string operation error - {opcode} index {index} out of range (length {length})")]
    IndexOutOfRange {
        opcode: &'static str,
        index: i64,
        length: usize,
    },

    /// INT2CHAR argument is not a Unicode scalar value.
    #[error("string operation error - {0} is not a valid character code")]
    InvalidCodepoint(i64),

    /// SETCHAR replacement string has no first character.
    #[error("string operation error - SETCHAR replacement string is empty")]
    EmptyReplacement,

    // --- Internal ---
    /// Writing to the output or diagnostic stream, or reading input, failed.
    #[error("internal error - {0}")]
    Io(String),

    /// Operands do not match the opcode's signature. The loader rules this
    /// out for loaded programs.
    #[error("internal error - malformed {opcode} instruction")]
    Malformed { opcode: &'static str },
}

impl Fault {
    /// Taxonomy entry for this fault.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Fault::TypeMismatch { .. } | Fault::WrongType { .. } | Fault::Overflow { .. } => {
                ErrorKind::InvalidOperand
            }
            Fault::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            Fault::UndefinedFrame(_) => ErrorKind::UndefinedFrame,
            Fault::Redefinition { .. } | Fault::UndefinedLabel(_) => ErrorKind::Semantic,
            Fault::Unassigned { .. } | Fault::EmptyCallStack | Fault::EmptyDataStack => {
                ErrorKind::MissingValue
            }
            Fault::DivisionByZero => ErrorKind::DivisionByZero,
            Fault::IndexOutOfRange { .. }
            | Fault::InvalidCodepoint(_)
            | Fault::EmptyReplacement => ErrorKind::StringOperation,
            Fault::Io(_) | Fault::Malformed { .. } => ErrorKind::Internal,
        }
    }

    /// Tag mismatch between two operands.
    pub(crate) fn mismatch(opcode: &'static str, left: TypeTag, right: TypeTag) -> Self {
        Fault::TypeMismatch {
            opcode,
            left: left.name(),
            right: right.name(),
        }
    }

    /// Operand carries the wrong tag for its position.
    pub(crate) fn wrong_type(opcode: &'static str, expected: TypeTag, found: TypeTag) -> Self {
        Fault::WrongType {
            opcode,
            expected: expected.name(),
            found: found.name(),
        }
    }
}

impl From<std::io::Error> for Fault {
    fn from(e: std::io::Error) -> Self {
        Fault::Io(e.to_string())
    }
}

/// A fault annotated with the `order` of the instruction that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{fault} (instruction {order})")]
pub struct RuntimeError {
    /// `order` attribute of the failing instruction.
    pub order: Order,
    /// The underlying failure.
    pub fault: Fault,
}

impl RuntimeError {
    pub fn new(order: Order, fault: Fault) -> Self {
        Self { order, fault }
    }

    /// Taxonomy entry for this error.
    pub fn kind(&self) -> ErrorKind {
        self.fault.kind()
    }
}
