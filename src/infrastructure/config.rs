use crate::domain::connection::ConnectionConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub sync: SyncSettings,
    pub layout: LayoutSettings,
    pub import: ImportSettings,
    pub connection: ConnectionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    Random,
    RoundRobin,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SyncSettings {
    pub interval_secs: u64,
    pub latency_ms: u64,
    /// Probability in `[0, 1]` that a simulated folder read fails
    pub failure_rate: f64,
    pub auto_refresh: bool,
    pub selection: SelectionPolicy,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            latency_ms: 1500,
            failure_rate: 0.0,
            auto_refresh: true,
            selection: SelectionPolicy::Random,
        }
    }
}

impl SyncSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutSettings {
    pub device_width: u32,
    pub margin: u32,
    pub chart_height: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            device_width: 390,
            margin: 32,
            chart_height: 220,
        }
    }
}

impl LayoutSettings {
    pub fn chart_width(&self) -> u32 {
        self.device_width.saturating_sub(self.margin)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImportSettings {
    pub directory: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("imports"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Load `config/app.*` (optional) overlaid with `APP__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.sync.interval(), Duration::from_secs(30));
        assert_eq!(config.sync.latency(), Duration::from_millis(1500));
        assert!(config.sync.auto_refresh);
        assert_eq!(config.sync.selection, SelectionPolicy::Random);
        assert_eq!(config.layout.chart_width(), 358);
        assert_eq!(config.connection, ConnectionConfig::default());
    }

    #[test]
    fn test_partial_sections_override_defaults() {
        let config = parse(
            r#"
            [sync]
            interval_secs = 5
            selection = "round_robin"

            [layout]
            device_width = 20
            margin = 32

            [connection]
            host = "files.internal"
            "#,
        );
        assert_eq!(config.sync.interval_secs, 5);
        assert_eq!(config.sync.latency_ms, 1500);
        assert_eq!(config.sync.selection, SelectionPolicy::RoundRobin);
        assert_eq!(config.layout.chart_width(), 0);
        assert_eq!(config.layout.chart_height, 220);
        assert_eq!(config.connection.host, "files.internal");
        assert_eq!(config.connection.port, "21");
    }
}
