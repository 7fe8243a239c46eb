//! `tracing` subscriber setup for the binary and ad-hoc tools.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once keeps the first
/// subscriber.
pub fn init_logging(level: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
