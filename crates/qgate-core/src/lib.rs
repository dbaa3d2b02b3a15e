//! Quality Gates - configuration-driven check execution
//!
//! Provides a gate runner that:
//! - Loads gate definitions from a JSON configuration file
//! - Executes each check as a shell command with timeout and env handling
//! - Aggregates check outcomes into blocking/non-blocking gate verdicts
//! - Renders console blocks and markdown reports

pub mod check;
pub mod config;
pub mod error;
pub mod expand;
pub mod gate;
pub mod report;
pub mod runner;
pub mod telemetry;

// Re-export key types
pub use check::{CheckConfig, CheckResult, CheckStatus, Remediation, Severity};
pub use config::{
    load_gate_config, Defaults, GateConfig, GateConfigFile, DEFAULT_CONFIG, DEFAULT_TIMEOUT_SECS,
};
pub use error::{ConfigError, Result, SelectionError};
pub use expand::expand_env_vars;
pub use gate::{
    run_exit_code, run_gate, GateResult, EXIT_BLOCKED, EXIT_CONFIG_ERROR, EXIT_SUCCESS,
};
pub use report::{
    format_check_result, format_duration, format_gate_list, format_gate_result, format_report,
    status_icon, status_label,
};
pub use runner::{build_environment, run_check, SKIP_CONDITION_TIMEOUT_SECS};
pub use telemetry::init_tracing;
