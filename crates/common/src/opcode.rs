//! Opcode table for the IPPcode18 instruction set.
//!
//! Every opcode has a fixed operand signature; the loader rejects any
//! instruction whose operands do not fit it.

use crate::operand::OperandKind;

use crate::operand::OperandKind::{Bool, Int, Label, Str, Symb, Type, Var};

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and calls
    /// Copy a symbol into a variable.
    Move,
    /// Replace the temporary frame with a fresh, empty one.
    CreateFrame,
    /// Move the temporary frame onto the local frame stack.
    PushFrame,
    /// Discard the top local frame.
    PopFrame,
    /// Declare a variable in a frame.
    DefVar,
    /// Save the return position and jump to a label.
    Call,
    /// Resume at the most recently saved return position.
    Return,

    // Data stack
    /// Push a symbol onto the data stack.
    PushS,
    /// Pop the data stack into a variable.
    PopS,

    // Arithmetic
    Add,
    Sub,
    Mul,
    /// Floor division.
    IDiv,

    // Relational
    Lt,
    Gt,
    Eq,

    // Logic
    And,
    Or,
    Not,

    // Conversion
    /// Integer codepoint to a one-character string.
    Int2Char,
    /// Codepoint of the character at an index.
    StrI2Int,

    // I/O
    /// Read one line of standard input as a given type.
    Read,
    /// Write a symbol to standard output.
    Write,

    // Strings
    Concat,
    StrLen,
    GetChar,
    SetChar,

    // Types
    /// Name of a symbol's type as a string.
    Type,

    // Flow control
    /// Jump target; no effect when executed.
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,

    // Debugging
    /// Write a symbol to the diagnostic stream.
    DPrint,
    /// Dump interpreter state to the diagnostic stream.
    Break,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 34] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::PushS,
    Opcode::PopS,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::IDiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::StrI2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::StrLen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::DPrint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::PushS => "PUSHS",
            Opcode::PopS => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::IDiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::StrI2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::StrLen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::DPrint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Look up an opcode by mnemonic. Case-sensitive.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }

    /// Operand kinds required at each position, in order.
    pub fn signature(&self) -> &'static [OperandKind] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::DefVar | Opcode::PopS => &[Var],
            Opcode::Call | Opcode::Label | Opcode::Jump => &[Label],
            Opcode::PushS | Opcode::Write | Opcode::DPrint => &[Symb],

            Opcode::Move | Opcode::Type => &[Var, Symb],
            Opcode::Not => &[Var, Bool],
            Opcode::Int2Char => &[Var, Int],
            Opcode::StrLen => &[Var, Str],
            Opcode::Read => &[Var, Type],

            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::IDiv => &[Var, Int, Int],
            Opcode::Lt | Opcode::Gt | Opcode::Eq => &[Var, Symb, Symb],
            Opcode::And | Opcode::Or => &[Var, Bool, Bool],
            Opcode::StrI2Int | Opcode::GetChar => &[Var, Str, Int],
            Opcode::Concat => &[Var, Str, Str],
            Opcode::SetChar => &[Var, Int, Str],
            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[Label, Symb, Symb],
        }
    }

    /// Number of operands this opcode takes.
    pub fn arity(&self) -> usize {
        self.signature().len()
    }

    /// Returns true if executing this opcode may move the program counter
    /// somewhere other than the next instruction.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Opcode::Call | Opcode::Return | Opcode::Jump | Opcode::JumpIfEq | Opcode::JumpIfNeq
        )
    }
}
