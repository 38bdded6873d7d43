//! Errors for loading and validating program documents.
//!
//! Every instruction-level error carries `at`: the instruction's `order`
//! attribute text, or `#N` (its 1-based element position) when the
//! attribute is missing.

use ippcode_common::{ErrorKind, LexError, Order};
use thiserror::Error;

/// Errors produced while turning a document into a [`Program`](ippcode_common::Program).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    // --- Input ---
    /// The document file could not be read.
    #[error("unable to open input file '{path}': {reason}")]
    InputFile { path: String, reason: String },

    // --- Document format ---
    /// Not well-formed XML.
    #[error("XML format error - {0}")]
    Xml(String),

    /// Root element is not `program`.
    #[error("XML format error - invalid root element '{0}'")]
    InvalidRoot(String),

    /// Root element has no `language` attribute.
    #[error("XML format error - language attribute missing")]
    MissingLanguage,

    /// A child of the root is not an `instruction` element.
    #[error("XML format error - unexpected element '{tag}' at position {position}")]
    UnexpectedElement { position: usize, tag: String },

    /// An instruction element does not have exactly two attributes.
    #[error("XML format error - instruction {at} has {count} attribute(s), expected 'order' and 'opcode'")]
    AttributeCount { at: String, count: usize },

    /// `order` or `opcode` is absent.
    #[error("XML format error - required attribute '{name}' missing on instruction {at}")]
    MissingAttribute { at: String, name: &'static str },

    // --- Source ---
    /// The language attribute names something other than IPPcode18.
    #[error("source code error - unknown language '{0}'")]
    UnknownLanguage(String),

    /// `order` is not an integer.
    #[error("source code error - invalid instruction order value '{at}'")]
    InvalidOrder { at: String },

    /// Opcode not in the opcode table.
    #[error("source code error - invalid opcode '{opcode}' on instruction {at}")]
    UnknownOpcode { at: String, opcode: String },

    /// Wrong number of argument elements for the opcode.
    #[error("source code error - {opcode} expects {expected} argument(s), found {found} on instruction {at}")]
    ArgumentCount {
        at: String,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// `argN` element not found.
    #[error("source code error - argument 'arg{index}' not found on instruction {at}")]
    MissingArgument { at: String, index: usize },

    /// `argN` element does not carry exactly one attribute.
    #[error("source code error - argument 'arg{index}' has {count} attribute(s), expected 'type' on instruction {at}")]
    ArgumentAttributes {
        at: String,
        index: usize,
        count: usize,
    },

    /// `argN` has no `type` attribute.
    #[error("source code error - argument 'arg{index}' has no 'type' attribute on instruction {at}")]
    MissingArgumentType { at: String, index: usize },

    /// `type` value is unknown or not allowed at this position.
    #[error("source code error - argument type '{found}' is incompatible with {opcode} at 'arg{index}' on instruction {at}")]
    IncompatibleArgument {
        at: String,
        index: usize,
        opcode: &'static str,
        found: String,
    },

    /// Argument text does not match its declared type.
    #[error("source code error - {reason} at 'arg{index}' on instruction {at}")]
    InvalidArgument {
        at: String,
        index: usize,
        reason: LexError,
    },

    // --- Semantic ---
    /// Two instructions share an `order` value.
    #[error("semantic error - instruction with order value '{order}' already exists")]
    DuplicateOrder { order: Order },

    /// A label name is defined twice.
    #[error("semantic error - redefinition of label '{label}' on instruction {at}")]
    DuplicateLabel { at: String, label: String },
}

impl LoadError {
    /// Taxonomy entry for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::InputFile { .. } => ErrorKind::InputFile,

            LoadError::Xml(_)
            | LoadError::InvalidRoot(_)
            | LoadError::MissingLanguage
            | LoadError::UnexpectedElement { .. }
            | LoadError::AttributeCount { .. }
            | LoadError::MissingAttribute { .. } => ErrorKind::DocumentFormat,

            LoadError::UnknownLanguage(_)
            | LoadError::InvalidOrder { .. }
            | LoadError::UnknownOpcode { .. }
            | LoadError::ArgumentCount { .. }
            | LoadError::MissingArgument { .. }
            | LoadError::ArgumentAttributes { .. }
            | LoadError::MissingArgumentType { .. }
            | LoadError::IncompatibleArgument { .. }
            | LoadError::InvalidArgument { .. } => ErrorKind::Source,

            LoadError::DuplicateOrder { .. } | LoadError::DuplicateLabel { .. } => {
                ErrorKind::Semantic
            }
        }
    }
}
