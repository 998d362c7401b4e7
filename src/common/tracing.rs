use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `observability.log_level`. Calling this twice is a no-op.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        ::tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
