// Tracing bootstrap for the CLI binary.
// RUST_LOG drives the filter (default "info"), JIVE_LOG_JSON=1 switches to JSON lines.

use crate::config::parse_bool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_json = std::env::var("JIVE_LOG_JSON")
        .ok()
        .and_then(|v| parse_bool("JIVE_LOG_JSON", &v).ok())
        .unwrap_or(false);

    // try_init: a second call (tests, embedding) is a no-op instead of a panic
    let result = if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("tracing already initialized: {}", e);
    }
}
