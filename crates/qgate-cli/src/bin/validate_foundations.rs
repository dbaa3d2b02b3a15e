//! Foundations Validator
//!
//! The `validate-foundations` command checks that the foundation documents
//! a project needs before implementation are present. Exits `0` when every
//! required document exists and `1` otherwise.

use clap::Parser;
use qgate_core::init_tracing;
use qgate_foundations::validate_foundations;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "validate-foundations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate foundation documents for implementation readiness", long_about = None)]
struct Cli {
    /// Directory to start searching from (default: current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    init_tracing(cli.json, level);

    let report = validate_foundations(&cli.path);
    let readiness = report.readiness();
    debug!(?readiness, "Foundations validated");

    println!("{}", report.render());
    ExitCode::from(readiness.exit_code())
}
