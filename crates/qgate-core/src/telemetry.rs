//! Log setup for `run-gates` and `validate-foundations`.
//!
//! Diagnostics (check spawns, skip decisions, gate verdicts) go to stderr;
//! stdout carries only the console blocks and markdown reports, so
//! `run-gates --report-only > progress.md` stays clean.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber for a gate binary.
///
/// `level` is what `--verbose` selects (WARN or DEBUG) and applies unless
/// `RUST_LOG` is set. `json` switches to one JSON object per line for CI
/// log collectors. A second call is a no-op.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry.with(stderr_layer.json()).try_init()
    } else {
        registry.with(stderr_layer).try_init()
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
