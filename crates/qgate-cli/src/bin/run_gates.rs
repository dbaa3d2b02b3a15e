//! Quality Gate Runner
//!
//! The `run-gates` command executes the gates declared in a JSON
//! configuration file and exits with:
//!
//! - `0` when every blocking gate passed
//! - `1` when at least one blocking gate failed
//! - `2` on configuration or argument errors

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use qgate_core::{
    format_gate_list, format_gate_result, format_report, init_tracing, load_gate_config,
    run_exit_code, run_gate, ConfigError, DEFAULT_CONFIG, EXIT_CONFIG_ERROR,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "run-gates")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Quality Gate Runner", long_about = None)]
#[command(after_help = "Examples:
  run-gates                              Run all gates
  run-gates --gate pre-implementation    Run a specific gate
  run-gates --phase implementation       Run all gates for a phase
  run-gates --report-only                Print a markdown report")]
struct Cli {
    /// Path to gate configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Run a specific gate by name or id
    #[arg(short, long)]
    gate: Option<String>,

    /// Run all gates for a phase
    #[arg(short, long)]
    phase: Option<String>,

    /// List available gates
    #[arg(short, long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only print the markdown report
    #[arg(long)]
    report_only: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    init_tracing(cli.json, level);

    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(ConfigError::NotFound(_)) = e.downcast_ref::<ConfigError>() {
                eprintln!("Create a gate configuration file or specify with --config");
            }
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

async fn run(cli: &Cli) -> Result<u8> {
    let config = load_gate_config(&cli.config)?;

    if cli.list {
        println!("{}", format_gate_list(&config));
        return Ok(0);
    }

    let defaults = config.defaults();
    let gates = config.select_gates(cli.gate.as_deref(), cli.phase.as_deref())?;
    debug!(count = gates.len(), "Selected gates");

    let mut results = Vec::with_capacity(gates.len());
    for gate in gates {
        if !cli.report_only {
            println!("\nRunning gate: {}...\n", gate.gate_id());
        }

        let result = run_gate(gate, &defaults).await;

        if !cli.report_only {
            println!("{}", format_gate_result(&result, cli.verbose));
        }
        results.push(result);
    }

    if cli.report_only {
        println!("{}", format_report(&results, &Local::now()));
    } else if cli.verbose && results.len() > 1 {
        println!("\n{}", "=".repeat(70));
        println!("MARKDOWN REPORT (for progress.md):");
        println!("{}\n", "=".repeat(70));
        println!("{}", format_report(&results, &Local::now()));
    }

    Ok(run_exit_code(&results))
}
