//! # ledgertap-observability
//!
//! Tracing and structured logging setup shared by the LedgerTap binaries.
//!
//! JSON-structured logs compatible with ELK, Loki, CloudWatch. Filtering
//! honors `RUST_LOG` when set; otherwise the configured default level plus
//! per-component overrides apply. In-process pipeline counters live next to
//! the pipeline itself (`ledgertap_stream::PipelineMetrics`).

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_level")]
    pub level: String,
    /// Per-component overrides as `(component, level)` pairs, e.g.
    /// `("ledgertap-stream", "debug")`.
    #[serde(default)]
    pub components: Vec<(String, String)>,
    /// Emit JSON structured logs instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: Vec::new(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_owned()
}

impl LogConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// The env-filter directive string, e.g. `"info,ledgertap_stream=debug"`.
    fn directives(&self) -> String {
        let mut out = self.level.clone();
        for (component, level) in &self.components {
            out.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        out
    }
}

/// Initialise tracing. Call once at process startup.
///
/// `RUST_LOG`, when set, takes precedence over the configured directives.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directives()))
        .unwrap_or_else(|_| EnvFilter::new(default_level()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_join_component_overrides() {
        let config = LogConfig {
            level: "warn".into(),
            components: vec![("ledgertap-stream".into(), "debug".into())],
            json: false,
        };
        assert_eq!(config.directives(), "warn,ledgertap_stream=debug");
    }
}
