//! VM state: frames, call and data stacks, I/O channels, operand access.

use std::io::{BufRead, Write};

use crate::error::Fault;
use crate::frame::FrameStore;
use ippcode_common::{Instruction, Operand, Program, TypeTag, Value, VarRef};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of instructions executed, counting repeats.
    pub executed: u64,
}

/// The IPPcode18 virtual machine.
///
/// Generic over its channels so tests can run against in-memory buffers:
/// `R` feeds READ, `W` receives WRITE, `E` receives DPRINT and BREAK.
pub struct Machine<'p, R, W, E> {
    /// The program being executed.
    pub(crate) program: &'p Program,
    pub(crate) frames: FrameStore,
    /// Return positions pushed by CALL.
    pub(crate) call_stack: Vec<usize>,
    /// Values pushed by PUSHS.
    pub(crate) data_stack: Vec<Value>,
    /// Position of the next instruction to fetch.
    pub(crate) pc: usize,
    pub(crate) executed: u64,
    pub(crate) input: R,
    pub(crate) output: W,
    pub(crate) diagnostics: E,
}

impl<'p, R: BufRead, W: Write, E: Write> Machine<'p, R, W, E> {
    /// Create a machine positioned at the first instruction with only the
    /// global frame defined.
    pub fn new(program: &'p Program, input: R, output: W, diagnostics: E) -> Self {
        Self {
            program,
            frames: FrameStore::new(),
            call_stack: Vec::new(),
            data_stack: Vec::new(),
            pc: 0,
            executed: 0,
            input,
            output,
            diagnostics,
        }
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    /// Data stack, bottom first.
    pub fn data_stack(&self) -> &[Value] {
        &self.data_stack
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }

    // --- Operand access ---

    pub(crate) fn operand<'i>(instr: &'i Instruction, idx: usize) -> Result<&'i Operand, Fault> {
        instr.operand(idx).ok_or(Fault::Malformed {
            opcode: instr.opcode.mnemonic(),
        })
    }

    /// The variable operand at `idx`.
    pub(crate) fn var<'i>(instr: &'i Instruction, idx: usize) -> Result<&'i VarRef, Fault> {
        match Self::operand(instr, idx)? {
            Operand::Var(var) => Ok(var),
            _ => Err(Fault::Malformed {
                opcode: instr.opcode.mnemonic(),
            }),
        }
    }

    /// The label operand at `idx`.
    pub(crate) fn label<'i>(instr: &'i Instruction, idx: usize) -> Result<&'i str, Fault> {
        match Self::operand(instr, idx)? {
            Operand::Label(name) => Ok(name),
            _ => Err(Fault::Malformed {
                opcode: instr.opcode.mnemonic(),
            }),
        }
    }

    /// Position of the LABEL instruction named `name`.
    pub(crate) fn resolve_label(&self, name: &str) -> Result<usize, Fault> {
        self.program
            .labels
            .position(name)
            .ok_or_else(|| Fault::UndefinedLabel(name.to_string()))
    }

    /// Value of a variable, or `None` if declared but unassigned.
    pub(crate) fn lookup(
        &self,
        operand: &Operand,
        opcode: &'static str,
    ) -> Result<Option<Value>, Fault> {
        match operand {
            Operand::Var(var) => Ok(self.frames.read(var)?.cloned()),
            Operand::Literal(value) => Ok(Some(value.clone())),
            Operand::Label(_) => Err(Fault::Malformed { opcode }),
        }
    }

    /// Resolve the symbol at `idx` to a value. Unassigned variables fail.
    pub(crate) fn symbol(&self, instr: &Instruction, idx: usize) -> Result<Value, Fault> {
        let operand = Self::operand(instr, idx)?;
        self.lookup(operand, instr.opcode.mnemonic())?
            .ok_or_else(|| Fault::Unassigned {
                var: operand.to_string(),
            })
    }

    pub(crate) fn int(&self, instr: &Instruction, idx: usize) -> Result<i64, Fault> {
        match self.symbol(instr, idx)? {
            Value::Int(n) => Ok(n),
            other => Err(wrong(instr, TypeTag::Int, &other)),
        }
    }

    pub(crate) fn boolean(&self, instr: &Instruction, idx: usize) -> Result<bool, Fault> {
        match self.symbol(instr, idx)? {
            Value::Bool(b) => Ok(b),
            other => Err(wrong(instr, TypeTag::Bool, &other)),
        }
    }

    pub(crate) fn string(&self, instr: &Instruction, idx: usize) -> Result<String, Fault> {
        match self.symbol(instr, idx)? {
            Value::Str(s) => Ok(s),
            other => Err(wrong(instr, TypeTag::String, &other)),
        }
    }

    /// Two symbols that must carry the same tag.
    pub(crate) fn same_tag_pair(
        &self,
        instr: &Instruction,
        first: usize,
    ) -> Result<(Value, Value), Fault> {
        let a = self.symbol(instr, first)?;
        let b = self.symbol(instr, first + 1)?;
        if a.type_tag() != b.type_tag() {
            return Err(Fault::mismatch(
                instr.opcode.mnemonic(),
                a.type_tag(),
                b.type_tag(),
            ));
        }
        Ok((a, b))
    }

    /// Store `value` in the instruction's target variable.
    pub(crate) fn store(&mut self, instr: &Instruction, value: Value) -> Result<(), Fault> {
        let target = instr.target().ok_or(Fault::Malformed {
            opcode: instr.opcode.mnemonic(),
        })?;
        self.frames.assign(target, value)
    }
}

fn wrong(instr: &Instruction, expected: TypeTag, found: &Value) -> Fault {
    Fault::wrong_type(instr.opcode.mnemonic(), expected, found.type_tag())
}
