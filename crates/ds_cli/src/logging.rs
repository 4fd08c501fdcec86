//! Tracing setup for the `ds` binary.
//!
//! The subscriber is only installed when `DS_LOG` (or `RUST_LOG`) is set.
//! `DS_LOG` takes precedence and uses the same filter syntax, e.g.
//! `DS_LOG=ds_lower=trace ds lower input.js`.

use tracing_subscriber::EnvFilter;

fn build_filter() -> Option<EnvFilter> {
    if let Ok(val) = std::env::var("DS_LOG") {
        return Some(EnvFilter::builder().parse_lossy(val));
    }
    if std::env::var("RUST_LOG").is_ok() {
        return Some(EnvFilter::from_default_env());
    }
    None
}

/// Install the global subscriber, writing to stderr so lowered code on
/// stdout stays clean.
pub fn init_tracing() {
    let Some(filter) = build_filter() else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
