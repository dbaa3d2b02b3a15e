//! Console and markdown rendering of gate results.
//!
//! Everything here is a pure function of already-computed results.

use crate::check::{CheckResult, CheckStatus};
use crate::config::GateConfigFile;
use crate::gate::GateResult;
use chrono::{DateTime, TimeZone};
use std::fmt;

const SEPARATOR_WIDTH: usize = 70;
const STDERR_PREVIEW_LINES: usize = 10;
const INDENT: &str = "       ";

/// Console glyph for a check status.
pub fn status_icon(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "[PASS]",
        CheckStatus::Fail => "[FAIL]",
        CheckStatus::Warn => "[WARN]",
        CheckStatus::Skip => "[SKIP]",
        CheckStatus::Error => "[ERR!]",
    }
}

/// Markdown table label for a check status.
pub fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Skip => "SKIP",
        CheckStatus::Error => "ERR!",
    }
}

/// Human-readable duration: `850ms`, `12.3s`, `2m 5s`.
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms < 1_000 {
        format!("{}ms", duration_ms)
    } else if duration_ms < 60_000 {
        format!("{:.1}s", duration_ms as f64 / 1_000.0)
    } else {
        let minutes = duration_ms / 60_000;
        let secs = (duration_ms % 60_000) as f64 / 1_000.0;
        format!("{}m {:.0}s", minutes, secs)
    }
}

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Render one check result as a console block.
pub fn format_check_result(result: &CheckResult, verbose: bool) -> String {
    let mut lines = vec![
        format!(
            "{} {} ({})",
            status_icon(result.status),
            result.name,
            result.check_id
        ),
        format!("{INDENT}Command: {}", result.command),
        format!("{INDENT}Duration: {}", format_duration(result.duration_ms)),
    ];

    if result.status == CheckStatus::Skip {
        lines.push(format!("{INDENT}Reason: {}", result.skip_reason));
    } else if let Some(code) = result.exit_code.filter(|_| result.status != CheckStatus::Pass) {
        lines.push(format!("{INDENT}Exit Code: {}", code));
    }

    if result.status.is_failure() && !result.remediation.is_empty() {
        lines.push(String::new());
        lines.push(format!("{INDENT}REMEDIATION:"));
        for step in &result.remediation {
            lines.push(format!("{INDENT}- {}", step));
        }
    }

    let shows_stderr = matches!(
        result.status,
        CheckStatus::Warn | CheckStatus::Fail | CheckStatus::Error
    );
    if verbose && shows_stderr && !result.error.trim().is_empty() {
        lines.push(String::new());
        lines.push(format!("{INDENT}STDERR:"));
        for line in result.error.trim().lines().take(STDERR_PREVIEW_LINES) {
            lines.push(format!("{INDENT}| {}", line));
        }
    }

    lines.join("\n")
}

/// Render a complete gate result with banner and verdict footer.
pub fn format_gate_result(result: &GateResult, verbose: bool) -> String {
    let separator = separator();
    let mut lines = vec![
        separator.clone(),
        format!("QUALITY GATE: {}", result.gate_id),
        format!("Phase: {} | Trigger: {}", result.phase, result.trigger),
        separator.clone(),
        String::new(),
    ];

    for check in &result.checks {
        lines.push(format_check_result(check, verbose));
        lines.push(String::new());
    }

    lines.push(separator.clone());

    if result.passed {
        lines.push("RESULT: PASSED - All checks completed successfully".to_string());
    } else if result.blocking {
        lines.push(format!(
            "RESULT: BLOCKED - {} blocking check(s) failed",
            result.blocking_failures()
        ));
        lines.push(String::new());
        lines.push("Cannot proceed until all blocking gates pass.".to_string());
    } else {
        lines.push(format!(
            "RESULT: WARNING - {} check(s) failed (non-blocking)",
            result.blocking_failures()
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Total Duration: {}",
        format_duration(result.duration_ms)
    ));
    lines.push(separator);

    lines.join("\n")
}

/// Render all gate results as a markdown report for progress tracking.
pub fn format_report<Tz>(results: &[GateResult], generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let blocked = results.iter().any(GateResult::is_blocked);

    let mut lines = vec![
        format!(
            "## Quality Gate Report - {}",
            generated_at.format("%Y-%m-%d %H:%M")
        ),
        String::new(),
        "### Summary".to_string(),
        format!("- **Gates Executed**: {}", total),
        format!("- **Gates Passed**: {}/{}", passed, total),
        format!(
            "- **Status**: {}",
            if blocked { "BLOCKED" } else { "PASSED" }
        ),
        String::new(),
    ];

    for result in results {
        lines.push(format!(
            "### Gate: {} [{}]",
            result.name,
            if result.passed { "PASS" } else { "FAIL" }
        ));
        lines.push(format!("- **Type**: {}", result.gate_type));
        lines.push(format!("- **Phase**: {}", result.phase));
        lines.push(format!(
            "- **Duration**: {}",
            format_duration(result.duration_ms)
        ));
        lines.push(String::new());

        lines.push("| Check | Status | Duration |".to_string());
        lines.push("|-------|--------|----------|".to_string());
        for check in &result.checks {
            lines.push(format!(
                "| {} | {} | {} |",
                check.name,
                status_label(check.status),
                format_duration(check.duration_ms)
            ));
        }
        lines.push(String::new());

        let failed: Vec<&CheckResult> = result
            .checks
            .iter()
            .filter(|c| c.status.is_failure())
            .collect();
        if !failed.is_empty() {
            lines.push("**Failed Checks:**".to_string());
            for check in failed {
                let exit_code = check
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "n/a".to_string());
                lines.push(format!("- **{}**: Exit code {}", check.name, exit_code));
                for step in &check.remediation {
                    lines.push(format!("  - {}", step));
                }
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// Render the `--list` overview of configured gates.
pub fn format_gate_list(config: &GateConfigFile) -> String {
    let mut lines = vec!["Available Quality Gates:".to_string(), String::new()];

    for gate in &config.gates {
        let mode = if gate.blocking {
            "blocking"
        } else {
            "non-blocking"
        };
        lines.push(format!("  {}", gate.gate_id()));
        lines.push(format!("    Name: {}", gate.gate_id()));
        lines.push(format!("    Type: {}", gate.gate_type()));
        lines.push(format!("    Phase: {}", gate.phase.as_deref().unwrap_or("-")));
        lines.push(format!("    Mode: {}", mode));
        lines.push(format!("    Checks: {}", gate.checks.len()));
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Severity;
    use crate::config::GateConfig;
    use chrono::Utc;

    fn check(name: &str, status: CheckStatus, severity: Severity) -> CheckResult {
        CheckResult {
            check_id: format!("{}-id", name),
            name: name.to_string(),
            status,
            command: "make test".to_string(),
            duration_ms: 1_500,
            exit_code: Some(if status == CheckStatus::Pass { 0 } else { 2 }),
            output: String::new(),
            error: String::new(),
            severity,
            remediation: vec![],
            skip_reason: String::new(),
        }
    }

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(0), "0ms");
        assert_eq!(format_duration(999), "999ms");
        assert_eq!(format_duration(1_000), "1.0s");
        assert_eq!(format_duration(12_340), "12.3s");
        assert_eq!(format_duration(125_000), "2m 5s");
    }

    #[test]
    fn test_check_block_shows_remediation_on_failure() {
        let mut result = check("unit", CheckStatus::Fail, Severity::Critical);
        result.remediation = vec!["Run cargo test locally".to_string()];

        let block = format_check_result(&result, false);
        assert!(block.starts_with("[FAIL] unit (unit-id)"));
        assert!(block.contains("Command: make test"));
        assert!(block.contains("Duration: 1.5s"));
        assert!(block.contains("Exit Code: 2"));
        assert!(block.contains("REMEDIATION:"));
        assert!(block.contains("- Run cargo test locally"));
    }

    #[test]
    fn test_check_block_pass_has_no_exit_code() {
        let block = format_check_result(&check("ok", CheckStatus::Pass, Severity::Critical), true);
        assert!(block.starts_with("[PASS] ok"));
        assert!(!block.contains("Exit Code"));
    }

    #[test]
    fn test_check_block_skip_reason() {
        let mut result = check("s", CheckStatus::Skip, Severity::Critical);
        result.exit_code = None;
        result.skip_reason = "Skip condition met: true".to_string();
        let block = format_check_result(&result, false);
        assert!(block.starts_with("[SKIP]"));
        assert!(block.contains("Reason: Skip condition met: true"));
    }

    #[test]
    fn test_verbose_stderr_truncated_to_ten_lines() {
        let mut result = check("w", CheckStatus::Warn, Severity::Warning);
        result.error = (1..=15)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");

        let quiet = format_check_result(&result, false);
        assert!(!quiet.contains("STDERR:"));

        let verbose = format_check_result(&result, true);
        assert!(verbose.contains("STDERR:"));
        assert!(verbose.contains("| line 10"));
        assert!(!verbose.contains("| line 11"));
    }

    #[test]
    fn test_verbose_stderr_hidden_for_pass() {
        let mut result = check("p", CheckStatus::Pass, Severity::Critical);
        result.error = "noise".to_string();
        assert!(!format_check_result(&result, true).contains("STDERR:"));
    }

    #[test]
    fn test_gate_footer_variants() {
        let gate = GateConfig::new("deploy", vec![]);
        let passed = GateResult::new(
            &gate,
            vec![check("a", CheckStatus::Pass, Severity::Critical)],
            10,
        );
        assert!(format_gate_result(&passed, false).contains("RESULT: PASSED"));

        let blocked = GateResult::new(
            &gate,
            vec![check("a", CheckStatus::Fail, Severity::Critical)],
            10,
        );
        let text = format_gate_result(&blocked, false);
        assert!(text.contains("QUALITY GATE: deploy"));
        assert!(text.contains("RESULT: BLOCKED - 1 blocking check(s) failed"));
        assert!(text.contains("Cannot proceed until all blocking gates pass."));

        let advisory = GateConfig::new("advisory", vec![]).non_blocking();
        let warned = GateResult::new(
            &advisory,
            vec![check("a", CheckStatus::Error, Severity::Critical)],
            10,
        );
        assert!(format_gate_result(&warned, false)
            .contains("RESULT: WARNING - 1 check(s) failed (non-blocking)"));
    }

    #[test]
    fn test_markdown_report() {
        let unit = GateConfig::new("unit-tests", vec![]).with_phase("implementation");
        let mut failing = check("lint", CheckStatus::Fail, Severity::Critical);
        failing.remediation = vec!["cargo clippy --fix".to_string()];
        let results = vec![
            GateResult::new(
                &unit,
                vec![check("tests", CheckStatus::Pass, Severity::Critical)],
                1_000,
            ),
            GateResult::new(&GateConfig::new("lint", vec![]), vec![failing], 500),
        ];

        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).single().expect("valid date");
        let report = format_report(&results, &at);

        assert!(report.starts_with("## Quality Gate Report - 2026-03-14 09:26"));
        assert!(report.contains("- **Gates Executed**: 2"));
        assert!(report.contains("- **Gates Passed**: 1/2"));
        assert!(report.contains("- **Status**: BLOCKED"));
        assert!(report.contains("### Gate: unit-tests [PASS]"));
        assert!(report.contains("- **Phase**: implementation"));
        assert!(report.contains("| tests | PASS | 1.5s |"));
        assert!(report.contains("### Gate: lint [FAIL]"));
        assert!(report.contains("**Failed Checks:**"));
        assert!(report.contains("- **lint**: Exit code 2"));
        assert!(report.contains("  - cargo clippy --fix"));
    }

    #[test]
    fn test_markdown_report_non_blocking_failure_is_passed() {
        let advisory = GateConfig::new("docs", vec![]).non_blocking();
        let results = vec![GateResult::new(
            &advisory,
            vec![check("links", CheckStatus::Fail, Severity::Critical)],
            10,
        )];
        let report = format_report(&results, &Utc::now());
        assert!(report.contains("- **Status**: PASSED"));
        assert!(report.contains("- **Gates Passed**: 0/1"));
    }

    #[test]
    fn test_gate_list() {
        let config = GateConfigFile::from_json_str(
            r#"{"version": "1", "gates": [
                {"name": "pre-deploy", "type": "deployment", "phase": "deploy", "checks": [{"command": "true"}, {"command": "true"}]},
                {"id": "docs", "blocking": false}
            ]}"#,
        )
        .expect("parse");

        let listing = format_gate_list(&config);
        assert!(listing.starts_with("Available Quality Gates:"));
        assert!(listing.contains("  pre-deploy\n    Name: pre-deploy\n    Type: deployment"));
        assert!(listing.contains("    Checks: 2"));
        assert!(listing.contains("  docs\n    Name: docs\n    Type: custom\n    Phase: -\n    Mode: non-blocking"));
    }
}
