//! Three-tier variable storage: global frame, local frame stack and the
//! pending temporary frame.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Fault;
use ippcode_common::{FrameTag, Value, VarRef};

/// A named-variable scope. A declared slot holds `None` until first assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    slots: BTreeMap<String, Option<Value>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `name`: `None` if undeclared, `Some(None)` if unassigned.
    pub fn slot(&self, name: &str) -> Option<&Option<Value>> {
        self.slots.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }
}

/// `{name=value, other=<unset>}` with names sorted.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (name, slot)) in self.slots.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(Value::Str(s)) => write!(f, "{name}={s:?}")?,
                Some(value) => write!(f, "{name}={value}")?,
                None => write!(f, "{name}=<unset>")?,
            }
        }
        f.write_str("}")
    }
}

/// State of the temporary frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Temporary {
    #[default]
    Undefined,
    Defined(Frame),
}

/// All frames of a running program.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    global: Frame,
    locals: Vec<Frame>,
    temporary: Temporary,
}

impl FrameStore {
    /// Global frame defined and empty, no local frames, temporary undefined.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    /// Current local frame (top of the stack).
    pub fn local(&self) -> Option<&Frame> {
        self.locals.last()
    }

    /// Number of frames on the local stack.
    pub fn local_depth(&self) -> usize {
        self.locals.len()
    }

    pub fn temporary(&self) -> Option<&Frame> {
        match &self.temporary {
            Temporary::Defined(frame) => Some(frame),
            Temporary::Undefined => None,
        }
    }

    /// The frame addressed by `tag`, if it exists.
    pub fn frame(&self, tag: FrameTag) -> Option<&Frame> {
        match tag {
            FrameTag::Global => Some(self.global()),
            FrameTag::Local => self.local(),
            FrameTag::Temporary => self.temporary(),
        }
    }

    fn frame_mut(&mut self, tag: FrameTag) -> Result<&mut Frame, Fault> {
        match tag {
            FrameTag::Global => Ok(&mut self.global),
            FrameTag::Local => self.locals.last_mut().ok_or(Fault::UndefinedFrame(tag)),
            FrameTag::Temporary => match &mut self.temporary {
                Temporary::Defined(frame) => Ok(frame),
                Temporary::Undefined => Err(Fault::UndefinedFrame(tag)),
            },
        }
    }

    /// Declare `var` without a value.
    pub fn declare(&mut self, var: &VarRef) -> Result<(), Fault> {
        let frame = self.frame_mut(var.frame)?;
        if frame.contains(&var.name) {
            return Err(Fault::Redefinition {
                var: var.to_string(),
            });
        }
        frame.slots.insert(var.name.clone(), None);
        Ok(())
    }

    /// Store `value` in an already declared `var`.
    pub fn assign(&mut self, var: &VarRef, value: Value) -> Result<(), Fault> {
        let frame = self.frame_mut(var.frame)?;
        match frame.slots.get_mut(&var.name) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(Fault::UndefinedVariable {
                var: var.to_string(),
            }),
        }
    }

    /// Current value of `var`; `Ok(None)` for a declared but unassigned slot.
    pub fn read(&self, var: &VarRef) -> Result<Option<&Value>, Fault> {
        let frame = self
            .frame(var.frame)
            .ok_or(Fault::UndefinedFrame(var.frame))?;
        frame
            .slot(&var.name)
            .map(Option::as_ref)
            .ok_or_else(|| Fault::UndefinedVariable {
                var: var.to_string(),
            })
    }

    /// Fail unless `var` can be assigned right now.
    pub fn check_assignable(&self, var: &VarRef) -> Result<(), Fault> {
        self.read(var).map(|_| ())
    }

    /// Replace the temporary frame with a fresh, empty, defined one.
    pub fn create_temporary(&mut self) {
        self.temporary = Temporary::Defined(Frame::new());
    }

    /// Move the temporary frame onto the local stack; the temporary frame
    /// becomes undefined.
    pub fn push_temporary(&mut self) -> Result<(), Fault> {
        match std::mem::take(&mut self.temporary) {
            Temporary::Defined(frame) => {
                self.locals.push(frame);
                Ok(())
            }
            Temporary::Undefined => Err(Fault::UndefinedFrame(FrameTag::Temporary)),
        }
    }

    /// Discard the top local frame.
    pub fn pop_local(&mut self) -> Result<Frame, Fault> {
        self.locals
            .pop()
            .ok_or(Fault::UndefinedFrame(FrameTag::Local))
    }
}

impl fmt::Display for FrameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GF: {}", self.global())?;
        match self.local() {
            Some(frame) => writeln!(f, "LF: {frame} (depth {})", self.local_depth())?,
            None => writeln!(f, "LF: <undefined>")?,
        }
        match self.temporary() {
            Some(frame) => write!(f, "TF: {frame}"),
            None => write!(f, "TF: <undefined>"),
        }
    }
}
