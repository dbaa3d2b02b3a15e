//! Check definitions and per-check results.

use crate::config::Defaults;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Check severity, controlling how an unexpected exit code is scored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Unexpected exit code fails the check and blocks the gate.
    #[default]
    Critical,

    /// Unexpected exit code is reported as a warning.
    Warning,

    /// Unexpected exit code is ignored.
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Skip,
    Error,
}

impl CheckStatus {
    /// Score a finished command against its expected exit code.
    ///
    /// Only critical checks can fail; warning checks degrade to `Warn`
    /// and informational checks always pass.
    pub fn classify(severity: Severity, exit_code: i32, expected_exit_code: i32) -> Self {
        if exit_code == expected_exit_code {
            return CheckStatus::Pass;
        }
        match severity {
            Severity::Warning => CheckStatus::Warn,
            Severity::Info => CheckStatus::Pass,
            Severity::Critical => CheckStatus::Fail,
        }
    }

    /// Whether this status counts as a failure (`Fail` or `Error`).
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckStatus::Fail | CheckStatus::Error)
    }
}

/// Ordered remediation steps attached to a check.
///
/// Accepted as a list of strings or as an object carrying a
/// `manual_steps` list. Any other shape yields no steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Remediation(pub Vec<String>);

impl Remediation {
    pub fn from_value(value: &Value) -> Self {
        let steps = match value {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("manual_steps") {
                Some(Value::Array(items)) => items,
                _ => return Self::default(),
            },
            _ => return Self::default(),
        };

        Self(
            steps
                .iter()
                .map(|step| match step {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }

    pub fn steps(&self) -> &[String] {
        &self.0
    }
}

/// Deserialize an environment map, rendering non-string scalars as text.
///
/// `{"PORT": 8080, "CI": true, "EMPTY": null}` becomes
/// `PORT=8080`, `CI=true`, `EMPTY=`.
pub(crate) fn deserialize_env<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

impl<'de> Deserialize<'de> for Remediation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Declarative description of one verification step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    /// Check identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Check type, used as identifier when `id` is absent.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub check_type: Option<String>,

    /// Human-readable name (defaults to the identifier).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Shell command template; may contain `${VAR}` / `${VAR:-default}`.
    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub severity: Severity,

    /// Timeout in seconds; fractional values allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,

    #[serde(default)]
    pub expected_exit_code: i32,

    /// Shell command; exit code 0 means the check is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if: Option<String>,

    /// Check-specific environment overrides.
    #[serde(default, deserialize_with = "deserialize_env")]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub remediation: Remediation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl CheckConfig {
    /// Create a critical check running `command`.
    pub fn new(id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: f64) -> Self {
        self.timeout = Some(timeout_secs);
        self
    }

    pub fn with_skip_if(mut self, condition: impl Into<String>) -> Self {
        self.skip_if = Some(condition.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_remediation(mut self, steps: Vec<String>) -> Self {
        self.remediation = Remediation(steps);
        self
    }

    /// Identifier: `id`, then `type`, then `"unknown"`.
    pub fn check_id(&self) -> &str {
        self.id
            .as_deref()
            .or(self.check_type.as_deref())
            .unwrap_or("unknown")
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.check_id())
    }

    /// Timeout in seconds; zero or negative means unbounded.
    pub fn effective_timeout(&self, defaults: &Defaults) -> f64 {
        self.timeout.unwrap_or_else(|| defaults.timeout_secs())
    }

    pub fn effective_working_dir<'a>(&'a self, defaults: &'a Defaults) -> &'a Path {
        self.working_dir
            .as_deref()
            .unwrap_or_else(|| defaults.working_dir())
    }
}

/// Result of executing one check. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub check_id: String,

    pub name: String,

    pub status: CheckStatus,

    /// Command as executed (after placeholder expansion).
    pub command: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Exit code, absent when the process never finished.
    pub exit_code: Option<i32>,

    /// Captured stdout.
    pub output: String,

    /// Captured stderr, or the execution error message.
    pub error: String,

    pub severity: Severity,

    pub remediation: Vec<String>,

    /// Reason the check was skipped (empty unless `Skip`).
    pub skip_reason: String,
}

impl CheckResult {
    /// Whether this result blocks its gate (critical `Fail`/`Error`).
    pub fn is_blocking_failure(&self) -> bool {
        self.status.is_failure() && self.severity == Severity::Critical
    }
}
