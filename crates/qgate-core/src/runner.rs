//! Check execution: skip conditions, placeholder expansion, shell
//! invocation with timeout, and outcome classification.

use crate::check::{CheckConfig, CheckResult, CheckStatus};
use crate::config::Defaults;
use crate::expand::expand_env_vars;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fixed timeout for evaluating a `skip_if` condition.
pub const SKIP_CONDITION_TIMEOUT_SECS: u64 = 30;

const TIMEOUT_REMEDIATION: &str = "Increase timeout or investigate slow execution";
const NOT_FOUND_REMEDIATION: &str = "Verify command is installed and in PATH";

/// Failure to obtain an exit status from a shell command.
#[derive(Error, Debug)]
enum ExecError {
    #[error("Command timed out after {0} seconds")]
    Timeout(f64),

    #[error("Command not found: {0}")]
    NotFound(#[source] std::io::Error),

    #[error("{0}")]
    Io(#[source] std::io::Error),
}

impl ExecError {
    fn from_spawn(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ExecError::NotFound(err)
        } else {
            ExecError::Io(err)
        }
    }
}

/// Build the environment a check runs with.
///
/// Process environment, overlaid with the default environment, overlaid
/// with the check environment. The child receives exactly this map.
pub fn build_environment(check: &CheckConfig, defaults: &Defaults) -> BTreeMap<String, String> {
    let mut env: BTreeMap<String, String> = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();
    env.extend(defaults.env.clone());
    env.extend(check.env.clone());
    env
}

fn shell_command(script: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(script);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }
}

/// Bound for a timeout in seconds; `None` when non-positive or not finite.
fn timeout_duration(timeout_secs: f64) -> Option<Duration> {
    if timeout_secs > 0.0 {
        Duration::try_from_secs_f64(timeout_secs).ok()
    } else {
        None
    }
}

/// Run `script` through the platform shell and wait for it.
///
/// A non-positive `timeout_secs` waits indefinitely. On timeout the child
/// is killed when its future is dropped.
async fn execute_shell(
    script: &str,
    env: &BTreeMap<String, String>,
    working_dir: Option<&Path>,
    timeout_secs: f64,
) -> Result<Output, ExecError> {
    let mut cmd = shell_command(script);
    cmd.env_clear()
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(ExecError::from_spawn)?;

    match timeout_duration(timeout_secs) {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ExecError::Timeout(timeout_secs))?
            .map_err(ExecError::Io),
        None => child.wait_with_output().await.map_err(ExecError::Io),
    }
}

/// Evaluate the check's `skip_if` condition.
///
/// Returns the skip reason when the condition exits 0. A condition that
/// errors or times out counts as not met, so the check still runs.
async fn evaluate_skip_condition(
    check: &CheckConfig,
    env: &BTreeMap<String, String>,
    timeout_secs: f64,
) -> Option<String> {
    let condition = check.skip_if.as_deref().filter(|c| !c.is_empty())?;

    match execute_shell(condition, env, None, timeout_secs).await {
        Ok(output) if output.status.code() == Some(0) => {
            Some(format!("Skip condition met: {}", condition))
        }
        Ok(_) => None,
        Err(e) => {
            warn!(check = %check.check_id(), error = %e, "Skip condition failed; running check");
            None
        }
    }
}

/// Execute a single check and return its result.
///
/// Never fails: spawn errors, timeouts and unexpected exit codes are all
/// folded into the returned [`CheckResult`].
pub async fn run_check(check: &CheckConfig, defaults: &Defaults) -> CheckResult {
    let check_id = check.check_id().to_string();
    let name = check.display_name().to_string();
    let severity = check.severity;
    let timeout_secs = check.effective_timeout(defaults);
    let remediation = check.remediation.steps().to_vec();

    let env = build_environment(check, defaults);

    if let Some(skip_reason) =
        evaluate_skip_condition(check, &env, SKIP_CONDITION_TIMEOUT_SECS as f64).await
    {
        info!(check = %check_id, reason = %skip_reason, "Skipping check");
        return CheckResult {
            check_id,
            name,
            status: CheckStatus::Skip,
            command: check.command.clone(),
            duration_ms: 0,
            exit_code: None,
            output: String::new(),
            error: String::new(),
            severity,
            remediation: Vec::new(),
            skip_reason,
        };
    }

    let command = expand_env_vars(&check.command, &env);
    let working_dir = check.effective_working_dir(defaults);

    info!(check = %check_id, "Executing check");
    debug!(check = %check_id, command = %command, timeout_secs, "Running");

    let start = Instant::now();
    let outcome = execute_shell(&command, &env, Some(working_dir), timeout_secs).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    let result = match outcome {
        Ok(output) => {
            let exit_code = output.status.code().unwrap_or(-1);
            CheckResult {
                check_id,
                name,
                status: CheckStatus::classify(severity, exit_code, check.expected_exit_code),
                command,
                duration_ms,
                exit_code: Some(exit_code),
                output: String::from_utf8_lossy(&output.stdout).to_string(),
                error: String::from_utf8_lossy(&output.stderr).to_string(),
                severity,
                remediation,
                skip_reason: String::new(),
            }
        }
        Err(e) => {
            let remediation = match &e {
                ExecError::Timeout(_) => prefixed(TIMEOUT_REMEDIATION, remediation),
                ExecError::NotFound(_) => prefixed(NOT_FOUND_REMEDIATION, remediation),
                ExecError::Io(_) => remediation,
            };
            CheckResult {
                check_id,
                name,
                status: CheckStatus::Error,
                command,
                duration_ms,
                exit_code: None,
                output: String::new(),
                error: e.to_string(),
                severity,
                remediation,
                skip_reason: String::new(),
            }
        }
    };

    debug!(
        check = %result.check_id,
        status = ?result.status,
        exit_code = ?result.exit_code,
        duration_ms = result.duration_ms,
        "Check finished"
    );
    result
}

fn prefixed(first: &str, rest: Vec<String>) -> Vec<String> {
    std::iter::once(first.to_string()).chain(rest).collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::check::Severity;

    fn defaults() -> Defaults {
        Defaults::default()
    }

    #[tokio::test]
    async fn test_expected_exit_code_passes() {
        let check = CheckConfig {
            expected_exit_code: 3,
            ..CheckConfig::new("exit3", "exit 3")
        };
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_severity_mapping_on_mismatch() {
        let critical = run_check(&CheckConfig::new("c", "exit 1"), &defaults()).await;
        assert_eq!(critical.status, CheckStatus::Fail);

        let warning = run_check(
            &CheckConfig::new("w", "exit 1").with_severity(Severity::Warning),
            &defaults(),
        )
        .await;
        assert_eq!(warning.status, CheckStatus::Warn);

        let info = run_check(
            &CheckConfig::new("i", "exit 7").with_severity(Severity::Info),
            &defaults(),
        )
        .await;
        assert_eq!(info.status, CheckStatus::Pass);
        assert_eq!(info.exit_code, Some(7));
    }

    #[tokio::test]
    async fn test_captures_output() {
        let check = CheckConfig::new("echo", "echo hello; echo oops >&2");
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.output.contains("hello"));
        assert!(result.error.contains("oops"));
    }

    #[tokio::test]
    async fn test_skip_condition_met() {
        let check = CheckConfig::new("skipped", "exit 1").with_skip_if("true");
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Skip);
        assert_eq!(result.skip_reason, "Skip condition met: true");
        assert_eq!(result.duration_ms, 0);
        assert_eq!(result.exit_code, None);
    }

    #[tokio::test]
    async fn test_skip_condition_not_met_runs_check() {
        let check = CheckConfig::new("runs", "exit 0").with_skip_if("false");
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.skip_reason.is_empty());
    }

    #[tokio::test]
    async fn test_skip_condition_unknown_command_runs_check() {
        let check = CheckConfig::new("runs", "exit 1").with_skip_if("definitely-not-a-command-xyz");
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn test_skip_condition_timeout_fails_open() {
        let check = CheckConfig::new("runs", "true").with_skip_if("sleep 5; true");
        let env = build_environment(&check, &defaults());
        assert_eq!(evaluate_skip_condition(&check, &env, 1.0).await, None);
    }

    #[tokio::test]
    async fn test_skip_condition_sees_check_env() {
        let check = CheckConfig::new("env-skip", "exit 1")
            .with_env("SKIP_ME", "yes")
            .with_skip_if("test \"$SKIP_ME\" = yes");
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Skip);
    }

    #[tokio::test]
    async fn test_timeout_is_error_with_remediation() {
        let check = CheckConfig::new("slow", "sleep 5")
            .with_timeout(1.0)
            .with_remediation(vec!["Profile the suite".to_string()]);
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.error, "Command timed out after 1 seconds");
        assert_eq!(
            result.remediation,
            vec![
                TIMEOUT_REMEDIATION.to_string(),
                "Profile the suite".to_string()
            ]
        );
        assert!(result.duration_ms < 5000);
    }

    #[tokio::test]
    async fn test_fractional_timeout_reported_verbatim() {
        let check = CheckConfig::new("slow", "sleep 5").with_timeout(0.5);
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.error, "Command timed out after 0.5 seconds");
        assert!(result.duration_ms < 5000);
    }

    #[tokio::test]
    async fn test_non_positive_timeout_is_unbounded() {
        for timeout in [0.0, -1.0] {
            let check = CheckConfig::new("unbounded", "sleep 1; exit 0").with_timeout(timeout);
            let result = run_check(&check, &defaults()).await;
            assert_eq!(result.status, CheckStatus::Pass, "timeout {}", timeout);
            assert_eq!(result.exit_code, Some(0));
        }

        let mut unbounded = defaults();
        unbounded.timeout = Some(0.0);
        let result = run_check(&CheckConfig::new("d", "sleep 1"), &unbounded).await;
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_timeout_duration_bounds() {
        assert_eq!(timeout_duration(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(timeout_duration(0.0), None);
        assert_eq!(timeout_duration(-3.0), None);
        assert_eq!(timeout_duration(f64::INFINITY), None);
    }

    #[tokio::test]
    async fn test_missing_working_dir_is_not_found_error() {
        let check = CheckConfig {
            working_dir: Some("/definitely/not/a/dir".into()),
            ..CheckConfig::new("nowhere", "true")
        };
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.status, CheckStatus::Error);
        assert!(result.error.starts_with("Command not found:"));
        assert_eq!(result.remediation[0], NOT_FOUND_REMEDIATION);
    }

    #[tokio::test]
    async fn test_env_precedence_check_over_defaults() {
        let mut defaults = defaults();
        defaults.env.insert("LEVEL".to_string(), "default".to_string());
        defaults.env.insert("ONLY_DEFAULT".to_string(), "d".to_string());

        let check = CheckConfig::new("env", "test \"$LEVEL\" = check && test \"$ONLY_DEFAULT\" = d")
            .with_env("LEVEL", "check");
        let result = run_check(&check, &defaults).await;
        assert_eq!(result.status, CheckStatus::Pass, "stderr: {}", result.error);
    }

    #[tokio::test]
    async fn test_placeholder_precedence_check_defaults_process() {
        std::env::set_var("QGATE_LAYER_ALL", "process");
        std::env::set_var("QGATE_LAYER_PROCESS_DEFAULTS", "process");
        std::env::set_var("QGATE_LAYER_PROCESS_ONLY", "process");

        let mut defaults = defaults();
        defaults.env.insert("QGATE_LAYER_ALL".to_string(), "defaults".to_string());
        defaults.env.insert(
            "QGATE_LAYER_PROCESS_DEFAULTS".to_string(),
            "defaults".to_string(),
        );

        let check = CheckConfig::new(
            "layers",
            "echo ${QGATE_LAYER_ALL:-x} ${QGATE_LAYER_PROCESS_DEFAULTS:-x} \
             ${QGATE_LAYER_PROCESS_ONLY:-x} ${QGATE_LAYER_UNSET:-fallback}",
        )
        .with_env("QGATE_LAYER_ALL", "check");

        let result = run_check(&check, &defaults).await;
        assert_eq!(result.status, CheckStatus::Pass, "stderr: {}", result.error);
        assert_eq!(result.output.trim(), "check defaults process fallback");
    }

    #[tokio::test]
    async fn test_command_placeholders_expanded() {
        let check = CheckConfig::new("expand", "echo ${GREETING:-hi} ${NAME:-world}")
            .with_env("NAME", "gates");
        let result = run_check(&check, &defaults()).await;
        assert_eq!(result.command, "echo hi gates");
        assert_eq!(result.output.trim(), "hi gates");
    }

    #[test]
    fn test_build_environment_inherits_process() {
        let env = build_environment(&CheckConfig::new("t", "true"), &defaults());
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(env.get("PATH"), Some(&path));
        }
    }
}
