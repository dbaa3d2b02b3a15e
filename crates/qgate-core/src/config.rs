//! Gate configuration file loading.

use crate::check::{deserialize_env, CheckConfig};
use crate::error::{ConfigError, Result, SelectionError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name.
pub const DEFAULT_CONFIG: &str = ".quality-gates.json";

/// Timeout applied when neither the check nor the defaults set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Run-wide defaults for every check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Defaults {
    /// Timeout in seconds; fractional values allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Environment overlaid on the process environment.
    #[serde(default, deserialize_with = "deserialize_env")]
    pub env: BTreeMap<String, String>,
}

impl Defaults {
    pub fn timeout_secs(&self) -> f64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS as f64)
    }

    pub fn working_dir(&self) -> &Path {
        self.working_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

/// A named collection of checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub gate_type: Option<String>,

    /// Pipeline phase this gate belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,

    /// Whether a failure of this gate fails the run.
    #[serde(default = "default_blocking")]
    pub blocking: bool,

    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

fn default_blocking() -> bool {
    true
}

impl GateConfig {
    /// Create a blocking gate with the given checks.
    pub fn new(name: impl Into<String>, checks: Vec<CheckConfig>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
            gate_type: None,
            phase: None,
            trigger: None,
            blocking: true,
            checks,
        }
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn non_blocking(mut self) -> Self {
        self.blocking = false;
        self
    }

    /// Identifier: `name`, then `id`, then `"unknown"`.
    pub fn gate_id(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("unknown")
    }

    pub fn gate_type(&self) -> &str {
        self.gate_type.as_deref().unwrap_or("custom")
    }

    pub fn phase(&self) -> &str {
        self.phase.as_deref().unwrap_or("unknown")
    }

    pub fn trigger(&self) -> &str {
        self.trigger.as_deref().unwrap_or("manual")
    }

    /// Whether `selector` names this gate by `name` or `id`.
    pub fn matches(&self, selector: &str) -> bool {
        self.name.as_deref() == Some(selector) || self.id.as_deref() == Some(selector)
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateConfigFile {
    pub version: Value,

    pub gates: Vec<GateConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Defaults>,

    /// Legacy spelling of `defaults`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_options: Option<Defaults>,
}

impl GateConfigFile {
    /// Parse a configuration document from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(ConfigError::Malformed)?;

        if value.get("version").is_none() {
            return Err(ConfigError::MissingVersion);
        }
        match value.get("gates") {
            Some(Value::Array(gates)) if !gates.is_empty() => {}
            Some(Value::Array(_)) | None | Some(Value::Null) => {
                return Err(ConfigError::MissingGates)
            }
            // Wrong type, reported as a shape error below.
            Some(_) => {}
        }

        serde_json::from_value(value).map_err(ConfigError::Invalid)
    }

    /// Gates to run, filtered by name/id and then by phase.
    pub fn select_gates(
        &self,
        gate: Option<&str>,
        phase: Option<&str>,
    ) -> std::result::Result<Vec<&GateConfig>, SelectionError> {
        let mut selected: Vec<&GateConfig> = self.gates.iter().collect();

        if let Some(wanted) = gate {
            selected.retain(|g| g.matches(wanted));
            if selected.is_empty() {
                return Err(SelectionError::GateNotFound(wanted.to_string()));
            }
        }

        if let Some(wanted) = phase {
            selected.retain(|g| g.phase.as_deref() == Some(wanted));
            if selected.is_empty() {
                return Err(SelectionError::PhaseNotFound(wanted.to_string()));
            }
        }

        if selected.is_empty() {
            return Err(SelectionError::NoGates);
        }
        Ok(selected)
    }

    /// Effective defaults: `defaults`, else `global_options`, else empty.
    pub fn defaults(&self) -> Defaults {
        self.defaults
            .clone()
            .or_else(|| self.global_options.clone())
            .unwrap_or_default()
    }
}

/// Load and validate a gate configuration file.
pub fn load_gate_config(path: impl AsRef<Path>) -> Result<GateConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = GateConfigFile::from_json_str(&raw)?;
    debug!(path = %path.display(), gates = config.gates.len(), "Loaded gate configuration");
    Ok(config)
}
