//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Crate events plus the request/response spans from the server's `TraceLayer`.
pub const DEFAULT_DIRECTIVE: &str = "crm_service=info,tower_http=info";

/// Install a global fmt subscriber. `RUST_LOG` overrides the default directive.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    // A second install (e.g. across tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
