//! Tracing / logging initialisation helpers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: crate name → level, e.g. `"sorokit-events" = "debug"`
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Override the level of one component.
    pub fn component(mut self, name: impl Into<String>, level: impl Into<String>) -> Self {
        self.components.insert(name.into(), level.into());
        self
    }

    /// Filter directive string, e.g. `"info,sorokit_events=debug"`.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }

    /// The directives as an `EnvFilter`, falling back to `info` when they
    /// do not parse.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.directives()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialise tracing with the given log config.
/// Should be called once at application startup; later calls return an error.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = config.filter();

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_normalise_crate_names() {
        let cfg = LogConfig::default()
            .component("sorokit-events", "debug")
            .component("sorokit-codec", "trace");
        assert_eq!(cfg.directives(), "info,sorokit_codec=trace,sorokit_events=debug");
    }

    #[test]
    fn config_from_json() {
        let cfg: LogConfig =
            serde_json::from_str(r#"{ "components": { "sorokit-rpc": "warn" }, "json": true }"#).unwrap();
        assert_eq!(cfg.level, "info");
        assert!(cfg.json);
        assert_eq!(cfg.directives(), "info,sorokit_rpc=warn");
    }

    #[test]
    fn bad_directives_fall_back() {
        let cfg = LogConfig::default().component("sorokit-events", "loud");
        assert_eq!(cfg.filter().to_string(), "info");
    }

    #[test]
    fn second_init_is_an_error() {
        let cfg = LogConfig::default();
        let _ = init_tracing(&cfg);
        assert!(init_tracing(&cfg).is_err());
    }
}
