//! Diagnostic logging setup

use anyhow::anyhow;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a stderr subscriber at the given level.
///
/// `RUST_LOG` takes precedence when set. Unknown level names fall back to `warn`.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(normalise_level(log_level)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {}", e))
}

fn normalise_level(level: &str) -> String {
    match level.to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" => "error".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_level() {
        assert_eq!(normalise_level("WARNING"), "warn");
        assert_eq!(normalise_level("Info"), "info");
        assert_eq!(normalise_level("critical"), "error");
    }
}
