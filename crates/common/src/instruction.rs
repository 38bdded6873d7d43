//! A single three-address instruction.

use std::fmt;

use crate::opcode::Opcode;
use crate::operand::{Operand, VarRef};
use crate::order::Order;

/// One instruction of a loaded program.
///
/// `order` is the document-supplied sort key, kept for diagnostics; the
/// instruction's address is its position in [`Program::instructions`](crate::Program).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Unique sort key from the source document.
    pub order: Order,
    /// Operands, exactly `opcode.arity()` of them.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create a new instruction with a small integer order.
    pub fn new(opcode: Opcode, order: i64, operands: Vec<Operand>) -> Self {
        Self::with_order(opcode, Order::from(order), operands)
    }

    /// Create a new instruction with an arbitrary order key.
    pub fn with_order(opcode: Opcode, order: Order, operands: Vec<Operand>) -> Self {
        Self {
            opcode,
            order,
            operands,
        }
    }

    /// Operand at `index`, if present.
    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }

    /// The variable this instruction writes, for opcodes whose first operand
    /// is a write target.
    pub fn target(&self) -> Option<&VarRef> {
        match self.operands.first() {
            Some(Operand::Var(var)) => Some(var),
            _ => None,
        }
    }

    /// The label named by a LABEL/JUMP/CALL/JUMPIF* instruction.
    pub fn label(&self) -> Option<&str> {
        match self.operands.first() {
            Some(Operand::Label(name)) => Some(name),
            _ => None,
        }
    }
}

/// Renders the instruction in source form: `MNEMONIC op1 op2 op3`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
