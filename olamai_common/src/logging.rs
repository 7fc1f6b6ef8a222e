use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events are shown at `level`. Everything else (hyper, h2, tower) stays at
/// `warn` so a debug session isn't drowned in transport noise.
pub fn filter_directive(level: &str) -> EnvFilter {
    let filter = format!(
        "warn,olamai_common={level},olamai_proto={level},\
        olamai_api_grpc={level},simulation_service={level}"
    );
    EnvFilter::builder().parse_lossy(filter)
}

/// Install the global subscriber for a binary.
/// `RUST_LOG` takes precedence over `level` when it is set.
pub fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_directive(level));
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    if let Err(e) = result {
        tracing::warn!("logger already initialized: {e}");
    }
}
