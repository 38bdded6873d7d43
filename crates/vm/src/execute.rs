//! Main execution loop and opcode dispatch for the IPPcode18 VM.

use std::cmp::Ordering;
use std::io::{BufRead, Write};

use crate::error::{Fault, RuntimeError};
use crate::machine::{Machine, RunSummary};
use ippcode_common::{lexical, Instruction, Opcode, Operand, TypeTag, Value};
use tracing::{debug, trace};

impl<'p, R: BufRead, W: Write, E: Write> Machine<'p, R, W, E> {
    /// Execute until the position runs past the last instruction or an
    /// instruction fails. Output written before a failure stays written.
    pub fn run(&mut self) -> Result<RunSummary, RuntimeError> {
        let program = self.program;
        debug!(
            instructions = program.len(),
            labels = program.labels.len(),
            "execution started"
        );

        while let Some(instr) = program.get(self.pc) {
            trace!(pc = self.pc, order = %instr.order, %instr, "execute");
            self.pc += 1;
            self.executed += 1;

            if let Err(fault) = self.step(instr) {
                debug!(
                    order = %instr.order,
                    executed = self.executed,
                    kind = ?fault.kind(),
                    "execution failed"
                );
                return Err(RuntimeError::new(instr.order.clone(), fault));
            }
            if instr.opcode.is_jump() {
                trace!(order = %instr.order, next = self.pc, "control transfer");
            }
        }

        debug!(executed = self.executed, "execution finished");
        Ok(RunSummary {
            executed: self.executed,
        })
    }

    /// Execute one instruction. `pc` already points past it; jumps overwrite it.
    pub(crate) fn step(&mut self, instr: &Instruction) -> Result<(), Fault> {
        match instr.opcode {
            // Frames and variables
            Opcode::Move => self.exec_move(instr),
            Opcode::CreateFrame => {
                self.frames.create_temporary();
                Ok(())
            }
            Opcode::PushFrame => self.frames.push_temporary(),
            Opcode::PopFrame => self.frames.pop_local().map(|_| ()),
            Opcode::DefVar => self.frames.declare(Self::var(instr, 0)?),

            // Calls and the data stack
            Opcode::Call => self.exec_call(instr),
            Opcode::Return => self.exec_return(),
            Opcode::PushS => self.exec_pushs(instr),
            Opcode::PopS => self.exec_pops(instr),

            // Arithmetic
            Opcode::Add => self.exec_arith(instr, i64::checked_add),
            Opcode::Sub => self.exec_arith(instr, i64::checked_sub),
            Opcode::Mul => self.exec_arith(instr, i64::checked_mul),
            Opcode::IDiv => self.exec_idiv(instr),

            // Relational and logic
            Opcode::Lt => self.exec_compare(instr, Ordering::is_lt),
            Opcode::Gt => self.exec_compare(instr, Ordering::is_gt),
            Opcode::Eq => self.exec_eq(instr),
            Opcode::And => self.exec_logic(instr, |a, b| a && b),
            Opcode::Or => self.exec_logic(instr, |a, b| a || b),
            Opcode::Not => self.exec_not(instr),

            // Conversions
            Opcode::Int2Char => self.exec_int2char(instr),
            Opcode::StrI2Int => self.exec_stri2int(instr),

            // I/O
            Opcode::Read => self.exec_read(instr),
            Opcode::Write => self.exec_write(instr),

            // Strings
            Opcode::Concat => self.exec_concat(instr),
            Opcode::StrLen => self.exec_strlen(instr),
            Opcode::GetChar => self.exec_getchar(instr),
            Opcode::SetChar => self.exec_setchar(instr),

            // Types
            Opcode::Type => self.exec_type(instr),

            // Control flow
            Opcode::Label => Ok(()),
            Opcode::Jump => self.exec_jump(instr),
            Opcode::JumpIfEq => self.exec_conditional_jump(instr, true),
            Opcode::JumpIfNeq => self.exec_conditional_jump(instr, false),

            // Debugging
            Opcode::DPrint => self.exec_dprint(instr),
            Opcode::Break => self.exec_break(instr),
        }
    }

    // ---- Frames and variables ----

    fn exec_move(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symbol(instr, 1)?;
        self.store(instr, value)
    }

    // ---- Calls and the data stack ----

    fn exec_call(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let target = self.resolve_label(Self::label(instr, 0)?)?;
        self.call_stack.push(self.pc);
        self.pc = target;
        Ok(())
    }

    fn exec_return(&mut self) -> Result<(), Fault> {
        self.pc = self.call_stack.pop().ok_or(Fault::EmptyCallStack)?;
        Ok(())
    }

    fn exec_pushs(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symbol(instr, 0)?;
        self.data_stack.push(value);
        Ok(())
    }

    fn exec_pops(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let target = Self::var(instr, 0)?;
        self.frames.check_assignable(target)?;
        let value = self.data_stack.pop().ok_or(Fault::EmptyDataStack)?;
        self.frames.assign(target, value)
    }

    // ---- Arithmetic ----

    fn exec_arith(
        &mut self,
        instr: &Instruction,
        op: fn(i64, i64) -> Option<i64>,
    ) -> Result<(), Fault> {
        let a = self.int(instr, 1)?;
        let b = self.int(instr, 2)?;
        let result = op(a, b).ok_or(Fault::Overflow {
            opcode: instr.opcode.mnemonic(),
        })?;
        self.store(instr, Value::Int(result))
    }

    fn exec_idiv(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let a = self.int(instr, 1)?;
        let b = self.int(instr, 2)?;
        if b == 0 {
            return Err(Fault::DivisionByZero);
        }
        let result = floor_div(a, b).ok_or(Fault::Overflow {
            opcode: instr.opcode.mnemonic(),
        })?;
        self.store(instr, Value::Int(result))
    }

    // ---- Relational and logic ----

    fn exec_compare(
        &mut self,
        instr: &Instruction,
        accept: fn(Ordering) -> bool,
    ) -> Result<(), Fault> {
        let (a, b) = self.same_tag_pair(instr, 1)?;
        let ordering = a.partial_cmp(&b).ok_or(Fault::Malformed {
            opcode: instr.opcode.mnemonic(),
        })?;
        self.store(instr, Value::Bool(accept(ordering)))
    }

    fn exec_eq(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let (a, b) = self.same_tag_pair(instr, 1)?;
        self.store(instr, Value::Bool(a == b))
    }

    fn exec_logic(&mut self, instr: &Instruction, op: fn(bool, bool) -> bool) -> Result<(), Fault> {
        let a = self.boolean(instr, 1)?;
        let b = self.boolean(instr, 2)?;
        self.store(instr, Value::Bool(op(a, b)))
    }

    fn exec_not(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let a = self.boolean(instr, 1)?;
        self.store(instr, Value::Bool(!a))
    }

    // ---- Conversions ----

    fn exec_int2char(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let code = self.int(instr, 1)?;
        let c = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(Fault::InvalidCodepoint(code))?;
        self.store(instr, Value::Str(c.to_string()))
    }

    fn exec_stri2int(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let s = self.string(instr, 1)?;
        let index = self.int(instr, 2)?;
        let c = char_at(instr.opcode.mnemonic(), &s, index)?;
        self.store(instr, Value::Int(i64::from(u32::from(c))))
    }

    // ---- I/O ----

    fn exec_read(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let target = Self::var(instr, 0)?;
        let tag = match Self::operand(instr, 1)? {
            Operand::Literal(Value::Type(tag)) => *tag,
            _ => {
                return Err(Fault::Malformed {
                    opcode: instr.opcode.mnemonic(),
                })
            }
        };
        self.frames.check_assignable(target)?;

        let mut buf = String::new();
        let line = match self.input.read_line(&mut buf)? {
            0 => None,
            _ => Some(strip_line_ending(&buf)),
        };
        let value = read_value(tag, line);
        trace!(%target, %value, "read");
        self.frames.assign(target, value)
    }

    fn exec_write(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symbol(instr, 0)?;
        write!(self.output, "{value}")?;
        Ok(())
    }

    // ---- Strings ----

    fn exec_concat(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let mut a = self.string(instr, 1)?;
        let b = self.string(instr, 2)?;
        a.push_str(&b);
        self.store(instr, Value::Str(a))
    }

    fn exec_strlen(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let s = self.string(instr, 1)?;
        let len = i64::try_from(s.chars().count()).map_err(|_| Fault::Overflow {
            opcode: instr.opcode.mnemonic(),
        })?;
        self.store(instr, Value::Int(len))
    }

    fn exec_getchar(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let s = self.string(instr, 1)?;
        let index = self.int(instr, 2)?;
        let c = char_at(instr.opcode.mnemonic(), &s, index)?;
        self.store(instr, Value::Str(c.to_string()))
    }

    fn exec_setchar(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let opcode = instr.opcode.mnemonic();
        let target = Self::var(instr, 0)?;
        let current = match self.frames.read(target)? {
            Some(Value::Str(s)) => s.clone(),
            Some(other) => {
                return Err(Fault::wrong_type(opcode, TypeTag::String, other.type_tag()))
            }
            None => {
                return Err(Fault::Unassigned {
                    var: target.to_string(),
                })
            }
        };
        let index = self.int(instr, 1)?;
        let replacement = self.string(instr, 2)?;

        let position = checked_index(opcode, &current, index)?;
        let c = replacement.chars().next().ok_or(Fault::EmptyReplacement)?;
        let updated: String = current
            .chars()
            .enumerate()
            .map(|(i, orig)| if i == position { c } else { orig })
            .collect();
        self.frames.assign(target, Value::Str(updated))
    }

    // ---- Types ----

    /// TYPE is the one reader that tolerates an unassigned variable.
    fn exec_type(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let operand = Self::operand(instr, 1)?;
        let name = self
            .lookup(operand, instr.opcode.mnemonic())?
            .map(|v| v.type_tag().name())
            .unwrap_or("");
        self.store(instr, Value::Str(name.to_string()))
    }

    // ---- Control flow ----

    fn exec_jump(&mut self, instr: &Instruction) -> Result<(), Fault> {
        self.pc = self.resolve_label(Self::label(instr, 0)?)?;
        Ok(())
    }

    /// Operand tags are checked before the comparison; the label is only
    /// resolved when the jump is taken.
    fn exec_conditional_jump(&mut self, instr: &Instruction, when_equal: bool) -> Result<(), Fault> {
        let (a, b) = self.same_tag_pair(instr, 1)?;
        if (a == b) == when_equal {
            self.exec_jump(instr)?;
        }
        Ok(())
    }

    // ---- Debugging ----

    fn exec_dprint(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symbol(instr, 0)?;
        write!(self.diagnostics, "{value}")?;
        Ok(())
    }

    fn exec_break(&mut self, instr: &Instruction) -> Result<(), Fault> {
        writeln!(
            self.diagnostics,
            "BREAK at position {} (order {}), {} instruction(s) executed",
            self.pc - 1,
            instr.order,
            self.executed
        )?;
        writeln!(self.diagnostics, "{}", self.frames)?;
        writeln!(
            self.diagnostics,
            "call stack depth {}, data stack depth {}",
            self.call_stack.len(),
            self.data_stack.len()
        )?;
        Ok(())
    }
}

/// Integer division rounding toward negative infinity. `None` on overflow
/// or a zero divisor.
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// Character position for a string index, or an out-of-range fault.
fn checked_index(opcode: &'static str, s: &str, index: i64) -> Result<usize, Fault> {
    let length = s.chars().count();
    usize::try_from(index)
        .ok()
        .filter(|&i| i < length)
        .ok_or(Fault::IndexOutOfRange {
            opcode,
            index,
            length,
        })
}

fn char_at(opcode: &'static str, s: &str, index: i64) -> Result<char, Fault> {
    let position = checked_index(opcode, s, index)?;
    s.chars().nth(position).ok_or(Fault::Malformed { opcode })
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Interpret one input line as the requested type, substituting the type's
/// default when it does not parse. End of input is `None`.
pub fn read_value(tag: TypeTag, line: Option<&str>) -> Value {
    let line = line.unwrap_or("");
    match tag {
        TypeTag::Int => Value::Int(lexical::parse_int(line.trim()).unwrap_or(0)),
        TypeTag::Bool => Value::Bool(line.to_lowercase() == "true"),
        TypeTag::String | TypeTag::Type => match lexical::check_string(line) {
            Ok(()) => Value::Str(line.to_string()),
            Err(_) => Value::Str(String::new()),
        },
    }
}
