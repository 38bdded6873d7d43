//! Instruction element → [`Instruction`] extraction.
//!
//! Checks run in a fixed order per instruction: attribute count, `order`,
//! `opcode`, argument count, then each argument's element, `type` attribute
//! and text. The first failure wins.

use std::collections::HashSet;

use crate::error::LoadError;
use ippcode_common::{
    lexical, ArgType, Instruction, LexError, Opcode, Operand, OperandKind, Order, Program,
    Value, VarRef,
};
use roxmltree::Node;
use tracing::trace;

/// Accumulates validated instructions across a document.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    orders: HashSet<Order>,
    labels: HashSet<String>,
    instructions: Vec<Instruction>,
}

impl Collector {
    /// Validate one `instruction` element. `position` is its 1-based index
    /// among the root's element children.
    pub(crate) fn add(&mut self, node: Node<'_, '_>, position: usize) -> Result<(), LoadError> {
        let at = node
            .attribute("order")
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{position}"));

        let count = node.attributes().len();
        if count != 2 {
            return Err(LoadError::AttributeCount { at, count });
        }

        let order = self.extract_order(node, &at)?;
        let opcode = extract_opcode(node, &at)?;
        let operands = extract_operands(node, &at, opcode)?;

        if opcode == Opcode::Label {
            if let Some(Operand::Label(name)) = operands.first() {
                if !self.labels.insert(name.clone()) {
                    return Err(LoadError::DuplicateLabel {
                        at,
                        label: name.clone(),
                    });
                }
            }
        }

        let instr = Instruction::with_order(opcode, order, operands);
        trace!(order = %instr.order, %instr, "instruction accepted");
        self.instructions.push(instr);
        Ok(())
    }

    /// Orders are compared numerically at any magnitude, so `007` and `7`
    /// collide.
    fn extract_order(&mut self, node: Node<'_, '_>, at: &str) -> Result<Order, LoadError> {
        let text = node.attribute("order").ok_or_else(|| LoadError::MissingAttribute {
            at: at.to_string(),
            name: "order",
        })?;

        let order = Order::parse(text.trim()).map_err(|_| LoadError::InvalidOrder {
            at: at.to_string(),
        })?;

        if !self.orders.insert(order.clone()) {
            return Err(LoadError::DuplicateOrder { order });
        }

        Ok(order)
    }

    /// Number of instructions accepted so far.
    pub(crate) fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Sort the accepted instructions and build the label table.
    pub(crate) fn finish(self) -> Program {
        Program::from_ordered(self.instructions)
    }
}

fn extract_opcode(node: Node<'_, '_>, at: &str) -> Result<Opcode, LoadError> {
    let text = node
        .attribute("opcode")
        .ok_or_else(|| LoadError::MissingAttribute {
            at: at.to_string(),
            name: "opcode",
        })?;

    Opcode::from_mnemonic(text).ok_or_else(|| LoadError::UnknownOpcode {
        at: at.to_string(),
        opcode: text.to_string(),
    })
}

fn extract_operands(
    node: Node<'_, '_>,
    at: &str,
    opcode: Opcode,
) -> Result<Vec<Operand>, LoadError> {
    let found = node.children().filter(Node::is_element).count();

    if found != opcode.arity() {
        return Err(LoadError::ArgumentCount {
            at: at.to_string(),
            opcode: opcode.mnemonic(),
            expected: opcode.arity(),
            found,
        });
    }

    opcode
        .signature()
        .iter()
        .enumerate()
        .map(|(idx, &kind)| extract_operand(node, at, opcode, idx + 1, kind))
        .collect()
}

/// Extract argument `index` (1-based) and check it against `kind`.
fn extract_operand(
    node: Node<'_, '_>,
    at: &str,
    opcode: Opcode,
    index: usize,
    kind: OperandKind,
) -> Result<Operand, LoadError> {
    let name = format!("arg{index}");
    let arg = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .ok_or_else(|| LoadError::MissingArgument {
            at: at.to_string(),
            index,
        })?;

    let count = arg.attributes().len();
    if count != 1 {
        return Err(LoadError::ArgumentAttributes {
            at: at.to_string(),
            index,
            count,
        });
    }

    let type_text = arg
        .attribute("type")
        .ok_or_else(|| LoadError::MissingArgumentType {
            at: at.to_string(),
            index,
        })?;

    let arg_type = ArgType::from_name(type_text)
        .filter(|&t| kind.accepts(t))
        .ok_or_else(|| LoadError::IncompatibleArgument {
            at: at.to_string(),
            index,
            opcode: opcode.mnemonic(),
            found: type_text.to_string(),
        })?;

    let text = arg.text().unwrap_or("");
    parse_operand(arg_type, text).map_err(|reason| LoadError::InvalidArgument {
        at: at.to_string(),
        index,
        reason,
    })
}

/// Build an operand from its declared type and element text.
pub(crate) fn parse_operand(arg_type: ArgType, text: &str) -> Result<Operand, LexError> {
    let malformed = |expected| LexError::Malformed {
        expected,
        text: text.to_string(),
    };

    match arg_type {
        ArgType::Var => VarRef::parse(text)
            .map(Operand::Var)
            .ok_or_else(|| malformed("var")),
        ArgType::Label => {
            if lexical::is_identifier(text) {
                Ok(Operand::Label(text.to_string()))
            } else {
                Err(malformed("label"))
            }
        }
        ArgType::Int | ArgType::Bool | ArgType::String | ArgType::Type => {
            let tag = arg_type.literal_tag().ok_or_else(|| malformed(arg_type.name()))?;
            Value::parse(tag, text).map(Operand::Literal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippcode_common::{FrameTag, TypeTag};

    #[test]
    fn parse_var_operand() {
        assert_eq!(
            parse_operand(ArgType::Var, "LF@x"),
            Ok(Operand::Var(VarRef::new(FrameTag::Local, "x")))
        );
        assert!(parse_operand(ArgType::Var, "x").is_err());
    }

    #[test]
    fn parse_label_operand() {
        assert_eq!(
            parse_operand(ArgType::Label, "while-loop"),
            Ok(Operand::Label("while-loop".to_string()))
        );
        assert_eq!(
            parse_operand(ArgType::Label, "GF@x"),
            Err(LexError::Malformed {
                expected: "label",
                text: "GF@x".to_string()
            })
        );
    }

    #[test]
    fn parse_literal_operands() {
        assert_eq!(
            parse_operand(ArgType::Int, "-3"),
            Ok(Operand::Literal(Value::Int(-3)))
        );
        assert_eq!(
            parse_operand(ArgType::Bool, "true"),
            Ok(Operand::Literal(Value::Bool(true)))
        );
        assert_eq!(
            parse_operand(ArgType::String, ""),
            Ok(Operand::Literal(Value::Str(String::new())))
        );
        assert_eq!(
            parse_operand(ArgType::Type, "bool"),
            Ok(Operand::Literal(Value::Type(TypeTag::Bool)))
        );
    }
}
