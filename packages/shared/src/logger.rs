//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `bin_name` (with `-` replaced by `_`)
/// and its dependencies log at `default_level`, and tower_http at `debug`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let default_directive = format!(
        "{crate_name}={default_level},mafia_server={default_level},tower_http=debug"
    );

    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(&default_directive), false),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok();

    if !installed {
        // a subscriber is already installed (e.g. in tests)
        tracing::debug!("Tracing subscriber already installed, keeping it");
    } else if !from_env {
        tracing::debug!("RUST_LOG unset or invalid, using '{default_directive}'");
    }
}
