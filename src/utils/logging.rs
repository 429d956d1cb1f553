use serde::Serialize;

/// Logs `value` as pretty JSON at DEBUG; serialization is skipped when DEBUG is off.
pub(crate) fn debug_pretty_json<T: Serialize>(what: &str, value: &T) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(pretty) => tracing::debug!("{what}:\n{pretty}"),
        Err(error) => tracing::debug!(%error, "{what}: <pretty serialize failed>"),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();
}
