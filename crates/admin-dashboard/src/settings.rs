//! # Settings
//!
//! Loaded with the `config` crate, later sources overriding earlier ones:
//!
//! 1. `config/default.toml` (required)
//! 2. `config/{APP_ENV}.toml` (optional, `APP_ENV` defaults to `local`)
//! 3. `APP_*` environment variables, with `__` for nesting
//!    (`APP_STORE_LATENCY_MS=0`, `APP_CONTROLLER__DEBOUNCE_MS=250`)

use page_controller::{ControllerConfig, GridError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Error loading settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid controller settings: {0}")]
    Invalid(#[from] GridError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the signed-in session is saved between runs.
    pub session_path: PathBuf,
    /// Simulated network delay of every list call.
    pub store_latency_ms: u64,
    /// Capacity of each store's request queue.
    pub store_buffer: usize,
    /// Demo products created per branch on startup.
    pub seed_products: u32,
    /// Tuning shared by every list controller.
    pub controller: ControllerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_path: PathBuf::from("session.json"),
            store_latency_ms: 0,
            store_buffer: 64,
            seed_products: 30,
            controller: ControllerConfig::default(),
        }
    }
}

impl Settings {
    /// Loads from `./config`, picking the profile from `APP_ENV`.
    pub fn load() -> Result<Self, SettingsError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());
        Self::load_from("config", &app_env)
    }

    pub fn load_from(dir: impl AsRef<Path>, app_env: &str) -> Result<Self, SettingsError> {
        let dir = dir.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(dir.join("default")))
            .add_source(config::File::from(dir.join(app_env)).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let settings: Settings = settings.try_deserialize()?;
        settings.controller.validate()?;
        Ok(settings)
    }

    pub fn store_latency(&self) -> Duration {
        Duration::from_millis(self.store_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("config")
    }

    #[test]
    fn test_default_profile_loads() {
        let settings = Settings::load_from(config_dir(), "missing-profile").unwrap();

        assert_eq!(settings.controller.debounce_ms, 400);
        assert_eq!(settings.controller.page_sizes, vec![10, 20, 50, 100]);
        assert_eq!(settings.controller.default_page_size, 20);
        assert!(settings.seed_products > 0);
    }

    #[test]
    fn test_zero_default_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[controller]\ndefault_page_size = 0\n",
        )
        .unwrap();

        let result = Settings::load_from(dir.path(), "local");
        assert!(matches!(
            result,
            Err(SettingsError::Invalid(GridError::InvalidPageSize { size: 0, .. }))
        ));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let result = Settings::load_from(config_dir().join("nope"), "local");
        assert!(matches!(result, Err(SettingsError::Load(_))));
    }
}
