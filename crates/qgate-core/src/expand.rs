//! `${VAR}` / `${VAR:-default}` placeholder expansion.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex is valid"));

/// Expand placeholders in `command` using `env`.
///
/// `env` is the fully built execution environment (process environment
/// overlaid with default and check variables), so lookups follow the same
/// precedence as the child process sees. Unset variables resolve to the
/// inline default, or to an empty string when none is given.
pub fn expand_env_vars(command: &str, env: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(command, |caps: &Captures<'_>| {
            let expr = &caps[1];
            let (name, default) = match expr.split_once(":-") {
                Some((name, default)) => (name, default),
                None => (expr, ""),
            };
            env.get(name)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        })
        .into_owned()
}
