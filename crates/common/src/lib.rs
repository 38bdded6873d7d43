//! IPPcode18 common types.
//!
//! This crate provides the data model shared by the loader and the VM:
//!
//! - [`Value`] and [`TypeTag`]: tagged runtime values, no implicit coercion
//! - [`Opcode`]: the 34 opcodes and their operand signatures
//! - [`Operand`], [`OperandKind`], [`VarRef`]: operands and what opcodes accept
//! - [`Instruction`] and [`Program`]: the sorted instruction sequence and label table
//! - [`Order`]: instruction sort keys of any magnitude
//! - [`lexical`]: the literal grammar (identifiers, integers, strings with `\ddd` escapes)
//! - [`ErrorKind`]: the error taxonomy and its exit codes
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod error;
pub mod instruction;
pub mod lexical;
pub mod opcode;
pub mod operand;
pub mod order;
pub mod program;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::{ErrorKind, LexError};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::{ArgType, FrameTag, Operand, OperandKind, VarRef};
pub use order::Order;
pub use program::{LabelTable, Program};
pub use type_tag::TypeTag;
pub use value::Value;
