//! IPPcode18 virtual machine: executes loaded programs.
//!
//! The VM walks the sorted instruction sequence with an explicit program
//! counter and owns all run state:
//! - A [`FrameStore`]: global frame, local frame stack, temporary frame
//! - A call stack of return positions
//! - A data stack for PUSHS/POPS
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{FrameTag, Instruction, Opcode, Operand, Program, Value, VarRef};
//! use ippcode_vm::run;
//!
//! let x = Operand::Var(VarRef::new(FrameTag::Global, "x"));
//! let program = Program::from_ordered(vec![
//!     Instruction::new(Opcode::DefVar, 1, vec![x.clone()]),
//!     Instruction::new(Opcode::Move, 2, vec![x.clone(), Operand::Literal(Value::Int(5))]),
//!     Instruction::new(Opcode::Write, 3, vec![x]),
//! ]);
//!
//! let mut out = Vec::new();
//! let summary = run(&program, std::io::empty(), &mut out, std::io::sink()).unwrap();
//! assert_eq!(out, b"5");
//! assert_eq!(summary.executed, 3);
//! ```

pub mod error;
pub mod execute;
pub mod frame;
pub mod machine;

pub use error::{Fault, RuntimeError};
pub use frame::{Frame, FrameStore};
pub use machine::{Machine, RunSummary};

use std::io::{BufRead, Write};

use ippcode_common::Program;

/// Execute a program against the given channels.
///
/// READ consumes lines from `input`, WRITE goes to `output`, DPRINT and
/// BREAK go to `diagnostics`.
///
/// # Errors
///
/// Returns the first [`RuntimeError`], tagged with the failing
/// instruction's `order`.
pub fn run<R: BufRead, W: Write, E: Write>(
    program: &Program,
    input: R,
    output: W,
    diagnostics: E,
) -> Result<RunSummary, RuntimeError> {
    Machine::new(program, input, output, diagnostics).run()
}
