//! Gate execution and pass/fail aggregation.

use crate::check::CheckResult;
use crate::config::{Defaults, GateConfig};
use crate::runner::run_check;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::info;

/// Result of running every check in a gate.
#[derive(Debug, Clone, PartialEq)]
pub struct GateResult {
    pub gate_id: String,

    pub name: String,

    pub gate_type: String,

    pub phase: String,

    pub trigger: String,

    /// Whether a failure of this gate fails the run.
    pub blocking: bool,

    /// Check results in declaration order.
    pub checks: Vec<CheckResult>,

    /// True iff no critical check failed or errored.
    pub passed: bool,

    /// Wall-clock duration of the whole gate in milliseconds.
    pub duration_ms: u64,

    pub timestamp: DateTime<Utc>,
}

impl GateResult {
    /// Assemble a result, deriving `passed` from the checks.
    pub fn new(gate: &GateConfig, checks: Vec<CheckResult>, duration_ms: u64) -> Self {
        let passed = !checks.iter().any(CheckResult::is_blocking_failure);
        Self {
            gate_id: gate.gate_id().to_string(),
            name: gate.gate_id().to_string(),
            gate_type: gate.gate_type().to_string(),
            phase: gate.phase().to_string(),
            trigger: gate.trigger().to_string(),
            blocking: gate.blocking,
            checks,
            passed,
            duration_ms,
            timestamp: Utc::now(),
        }
    }

    /// Number of critical checks that failed or errored.
    pub fn blocking_failures(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.is_blocking_failure())
            .count()
    }

    /// Whether this gate stops the run (blocking and not passed).
    pub fn is_blocked(&self) -> bool {
        self.blocking && !self.passed
    }
}

/// Exit code for a run with no blocked gates.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code when at least one blocking gate failed.
pub const EXIT_BLOCKED: u8 = 1;
/// Exit code for configuration and argument errors.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Process exit code for a completed run.
pub fn run_exit_code(results: &[GateResult]) -> u8 {
    if results.iter().any(GateResult::is_blocked) {
        EXIT_BLOCKED
    } else {
        EXIT_SUCCESS
    }
}

/// Execute every check in `gate`, sequentially and in declaration order.
pub async fn run_gate(gate: &GateConfig, defaults: &Defaults) -> GateResult {
    let start = Instant::now();
    info!(gate = %gate.gate_id(), checks = gate.checks.len(), "Starting gate");

    let mut results = Vec::with_capacity(gate.checks.len());
    for check in &gate.checks {
        results.push(run_check(check, defaults).await);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    let result = GateResult::new(gate, results, duration_ms);

    if result.passed {
        info!(gate = %result.gate_id, duration_ms, "Gate passed");
    } else {
        info!(
            gate = %result.gate_id,
            blocking = result.blocking,
            failures = result.blocking_failures(),
            "Gate failed"
        );
    }
    result
}
