//! Error taxonomy shared by the loader, the VM and the CLI.

use thiserror::Error;

/// Classifies every failure the interpreter can report.
///
/// Each kind maps to exactly one process exit code (see [`ErrorKind::exit_code`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Command line arguments were missing or contradictory.
    InvalidArguments,
    /// The input document could not be opened or read.
    InputFile,
    /// The document is not well-formed or breaks the element/attribute layout.
    DocumentFormat,
    /// Unknown opcode, bad operand count/type/content, unsupported language.
    Source,
    /// Duplicate label or order, redefined variable, undefined jump target.
    Semantic,
    /// Operand tag mismatch or wrong required tag.
    InvalidOperand,
    /// Access to a variable that was never declared.
    UndefinedVariable,
    /// Access to a frame that does not exist.
    UndefinedFrame,
    /// Empty call/data stack or read of an unassigned variable.
    MissingValue,
    /// Integer division by zero.
    DivisionByZero,
    /// String index out of range or invalid character conversion.
    StringOperation,
    /// Failure outside the program's semantics (I/O on the output channel).
    Internal,
}

/// All error kinds, in exit code order.
pub const ALL_ERROR_KINDS: [ErrorKind; 12] = [
    ErrorKind::InvalidArguments,
    ErrorKind::InputFile,
    ErrorKind::DocumentFormat,
    ErrorKind::Source,
    ErrorKind::Semantic,
    ErrorKind::InvalidOperand,
    ErrorKind::UndefinedVariable,
    ErrorKind::UndefinedFrame,
    ErrorKind::MissingValue,
    ErrorKind::DivisionByZero,
    ErrorKind::StringOperation,
    ErrorKind::Internal,
];

impl ErrorKind {
    /// Process exit code reported for this kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::InvalidArguments => 10,
            ErrorKind::InputFile => 11,
            ErrorKind::DocumentFormat => 31,
            ErrorKind::Source => 32,
            ErrorKind::Semantic => 52,
            ErrorKind::InvalidOperand => 53,
            ErrorKind::UndefinedVariable => 54,
            ErrorKind::UndefinedFrame => 55,
            ErrorKind::MissingValue => 56,
            ErrorKind::DivisionByZero => 57,
            ErrorKind::StringOperation => 58,
            ErrorKind::Internal => 99,
        }
    }
}

/// A literal whose text does not match the grammar of its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Text is not a valid literal of the named type.
    #[error("'{text}' is not a valid {expected} literal")]
    Malformed { expected: &'static str, text: String },

    /// Integer literal is syntactically valid but outside the i64 range.
    #[error("integer literal '{0}' does not fit in 64 bits")]
    IntegerOverflow(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn exit_codes_are_distinct() {
        let codes: HashSet<i32> = ALL_ERROR_KINDS.iter().map(|k| k.exit_code()).collect();
        assert_eq!(codes.len(), ALL_ERROR_KINDS.len());
    }

    #[test]
    fn runtime_codes_are_contiguous() {
        assert_eq!(ErrorKind::InvalidOperand.exit_code(), 53);
        assert_eq!(ErrorKind::StringOperation.exit_code(), 58);
        assert_eq!(ErrorKind::Internal.exit_code(), 99);
    }

    #[test]
    fn display_malformed() {
        let e = LexError::Malformed {
            expected: "int",
            text: "12a".to_string(),
        };
        assert_eq!(e.to_string(), "'12a' is not a valid int literal");
    }

    #[test]
    fn display_overflow() {
        assert_eq!(
            LexError::IntegerOverflow("99999999999999999999".to_string()).to_string(),
            "integer literal '99999999999999999999' does not fit in 64 bits"
        );
    }
}
