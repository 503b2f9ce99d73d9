//! Tracing subscriber initialization.
//!
//! Log levels are controlled with the standard `RUST_LOG` environment
//! variable (e.g. `RUST_LOG=rosterd=debug,tower_http=debug`), defaulting
//! to `info` when unset.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already set, so call it exactly once at
/// startup; tests rely on `test-log` instead.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
