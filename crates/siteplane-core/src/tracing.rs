use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured JSON stdout tracing. Call once at service startup.
///
/// `RUST_LOG` controls the filter; absent, everything at `info` and above
/// is emitted. The service name is logged on init so aggregated logs can
/// be attributed when several services share a sink.
///
/// Safe to call multiple times — subsequent calls are silently ignored.
pub fn init_tracing(service: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
    tracing::info!(service, "tracing initialized");
}
