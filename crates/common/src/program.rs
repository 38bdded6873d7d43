//! A loaded program: instructions in execution order plus the label table.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::instruction::Instruction;
use crate::opcode::Opcode;

/// Maps label names to positions in the instruction sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    positions: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a label. Returns false (and keeps the existing entry) if the
    /// name is already present.
    pub fn insert(&mut self, name: impl Into<String>, position: usize) -> bool {
        match self.positions.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(position);
                true
            }
        }
    }

    /// Position of the LABEL instruction with this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Labels sorted by position.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .positions
            .iter()
            .map(|(name, &pos)| (name.as_str(), pos))
            .collect();
        entries.sort_by_key(|&(_, pos)| pos);
        entries
    }
}

/// An IPPcode18 program ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Instructions sorted by `order`. Positions in this vector are the
    /// addressable execution units.
    pub instructions: Vec<Instruction>,
    /// Label name to position.
    pub labels: LabelTable,
}

impl Program {
    /// Sort instructions by `order` and derive the label table from the
    /// LABEL instructions. If a label name repeats, the first position wins;
    /// the loader rejects such documents before getting here.
    pub fn from_ordered(mut instructions: Vec<Instruction>) -> Self {
        instructions.sort_by(|a, b| a.order.cmp(&b.order));

        let mut labels = LabelTable::new();
        for (pos, instr) in instructions.iter().enumerate() {
            if instr.opcode == Opcode::Label {
                if let Some(name) = instr.label() {
                    labels.insert(name, pos);
                }
            }
        }

        Self {
            instructions,
            labels,
        }
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at a position.
    pub fn get(&self, position: usize) -> Option<&Instruction> {
        self.instructions.get(position)
    }

    /// Human-readable listing, one instruction per line:
    /// `position  [order]  MNEMONIC operands`.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (pos, instr) in self.instructions.iter().enumerate() {
            let _ = writeln!(out, "{pos:>4}  [{}]  {instr}", instr.order);
        }
        out
    }
}
