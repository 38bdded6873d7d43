//! CLI command implementations.

use std::fmt::Display;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ippcode_common::ErrorKind;
use tracing::{debug, info};

/// Load and execute the program at `source`. On failure the diagnostic has
/// already been printed and the exit code is returned.
pub fn interpret(source: &Path) -> Result<(), i32> {
    let program = ippcode_loader::load_file(source).map_err(|e| report(e.kind(), &e))?;
    info!(
        source = %source.display(),
        instructions = program.len(),
        "program loaded"
    );

    let mut output = BufWriter::new(io::stdout().lock());
    let result = ippcode_vm::run(&program, io::stdin().lock(), &mut output, io::stderr());
    let flushed = output.flush();

    match result {
        Ok(summary) => {
            debug!(executed = summary.executed, "program finished");
            flushed.map_err(|e| {
                report(
                    ErrorKind::Internal,
                    &format!("internal error - cannot write output: {e}"),
                )
            })
        }
        Err(e) => Err(report(e.kind(), &e)),
    }
}

/// Print the single diagnostic line and return the exit code for `kind`.
fn report(kind: ErrorKind, err: &dyn Display) -> i32 {
    eprintln!("[ ERROR ] {err}");
    kind.exit_code()
}
