//! IPPcode18 interpreter: load an XML program and execute it.
//!
//! Exit codes:
//! - 0: Success
//! - 10: Invalid command line arguments
//! - 11: Input file cannot be read
//! - 31: Malformed document
//! - 32: Source error (opcode, operands, language)
//! - 52: Semantic error (duplicate label or order, redefinition, undefined label)
//! - 53..=58: Runtime errors
//! - 99: Internal error

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, CommandFactory, Parser};
use ippcode_common::ErrorKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "interpret")]
#[command(about = "Interpret an IPPcode18 program stored as XML")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Path to the XML program
    #[arg(short = 'f', long = "source", value_name = "FILE", required_unless_present = "help")]
    source: Option<PathBuf>,

    /// Enable debug output on stderr
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Print help (cannot be combined with other arguments)
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue, conflicts_with_all = ["source", "debug"])]
    help: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let message = e.to_string();
            let first = message.lines().next().unwrap_or_default();
            eprintln!(
                "[ ERROR ] invalid arguments - {}",
                first.trim_start_matches("error: ")
            );
            process::exit(ErrorKind::InvalidArguments.exit_code());
        }
    };

    if cli.help {
        if Cli::command().print_help().is_err() {
            process::exit(ErrorKind::Internal.exit_code());
        }
        println!();
        return;
    }

    init_logging(cli.debug);

    let Some(source) = cli.source else {
        eprintln!("[ ERROR ] invalid arguments - missing --source");
        process::exit(ErrorKind::InvalidArguments.exit_code());
    };

    if let Err(code) = commands::interpret(&source) {
        process::exit(code);
    }
}

/// Log to stderr. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default = if debug {
        "ippcode_cli=debug,ippcode_loader=debug,ippcode_vm=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
