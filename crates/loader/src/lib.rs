//! IPPcode18 loader: XML document to validated program.
//!
//! The loader turns an untrusted document into a [`Program`]: instructions
//! sorted by their `order` attribute plus a label table mapping each label
//! to its position in that sorted sequence. Loading is all-or-nothing; the
//! first failure is returned and no partial program is exposed.
//!
//! # Usage
//!
//! ```
//! use ippcode_loader::load_str;
//!
//! let program = load_str(r#"
//!     <program language="IPPcode18">
//!         <instruction order="2" opcode="WRITE"><arg1 type="int">5</arg1></instruction>
//!         <instruction order="1" opcode="LABEL"><arg1 type="label">start</arg1></instruction>
//!     </program>
//! "#).unwrap();
//!
//! assert_eq!(program.len(), 2);
//! assert_eq!(program.labels.position("start"), Some(0));
//! ```
//!
//! # Checks
//!
//! 1. **Document**: well-formed XML, `program` root, `language="IPPcode18"`
//! 2. **Instruction**: `instruction` elements with exactly `order` and `opcode`;
//!    unique integer order; known opcode
//! 3. **Arguments**: `arg1..argN` matching the opcode's arity, one `type`
//!    attribute each, allowed at that position
//! 4. **Lexical**: element text matches the declared type; string escapes decoded
//! 5. **Labels**: label names unique

pub mod document;
pub mod error;

mod parser;

pub use error::LoadError;

use std::fs;
use std::path::Path;

use ippcode_common::Program;
use parser::Collector;
use tracing::{debug, trace};

/// Load a program from document text.
pub fn load_str(text: &str) -> Result<Program, LoadError> {
    let doc = roxmltree::Document::parse(text).map_err(|e| LoadError::Xml(e.to_string()))?;
    let root = document::check_root(&doc)?;

    let mut collector = Collector::default();
    for (idx, node) in document::instruction_elements(root).enumerate() {
        collector.add(node?, idx + 1)?;
    }
    debug!(instructions = collector.len(), "document validated");

    let program = collector.finish();
    debug!(
        instructions = program.len(),
        labels = program.labels.len(),
        "instruction table:\n{}",
        program.listing()
    );
    trace!(labels = ?program.labels.sorted(), "label positions");
    Ok(program)
}

/// Load a program from a document on disk.
///
/// An unreadable path is [`LoadError::InputFile`]; content that is not UTF-8
/// is a document format error.
pub fn load_file(path: &Path) -> Result<Program, LoadError> {
    debug!(path = %path.display(), "loading program");
    let bytes = fs::read(path).map_err(|e| LoadError::InputFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8(bytes).map_err(|e| LoadError::Xml(e.to_string()))?;
    load_str(&text)
}
