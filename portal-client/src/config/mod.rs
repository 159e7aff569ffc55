use portal_core::CoreError;
use portal_core::config::load_layered;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Backend root including the `/api` prefix, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
    /// Keep the session on disk between runs.
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            path: default_session_path(),
            persist: default_persist(),
        }
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".portal/session.json")
}

fn default_persist() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector, e.g. `http://localhost:4317`. No export when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, CoreError> {
    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Run either from the crate directory or from the workspace root
    let configuration_directory = if base_path.ends_with("portal-client") {
        base_path.join("config")
    } else {
        base_path.join("portal-client").join("config")
    };

    load_layered(&configuration_directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "api": { "base_url": "http://backend/api" }
        }))
        .unwrap();

        assert_eq!(settings.api.timeout(), Duration::from_secs(30));
        assert_eq!(settings.session.path, PathBuf::from(".portal/session.json"));
        assert!(settings.session.persist);
        assert_eq!(settings.telemetry.log_level, "info");
        assert!(settings.telemetry.otlp_endpoint.is_none());
    }
}
