use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::catalog::DEFAULT_UNIVERSE_SIZE;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub tui: TuiConfig,
}

/// Upstream catalog API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the PokéAPI v2 endpoints.
    pub base_url: String,
    /// Number of entries requested from the index.
    pub universe_size: u32,
    /// Detail fetches issued concurrently per batch.
    pub batch_size: usize,
    /// Preferred flavor-text language.
    pub language: String,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Entries per catalog page.
    pub page_size: usize,
    /// View mode on startup.
    pub default_view: ViewModeSetting,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewModeSetting {
    #[default]
    Grid,
    List,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pokeapi.co/api/v2".to_string(),
            universe_size: DEFAULT_UNIVERSE_SIZE,
            batch_size: 50,
            language: "en".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            page_size: 24,
            default_view: ViewModeSetting::Grid,
            mouse_enabled: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/pokedex/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, with the same fallbacks as [`load`](Self::load).
    pub fn load_from(config_path: &Path) -> Self {
        let config = match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        };
        config.sanitized()
    }

    /// Clamp sizes that would make the loader or pager divide by zero.
    pub fn sanitized(mut self) -> Self {
        if self.api.batch_size == 0 {
            log::warn!("api.batch_size must be at least 1, using 1");
            self.api.batch_size = 1;
        }
        if self.api.universe_size == 0 {
            log::warn!("api.universe_size must be at least 1, using 1");
            self.api.universe_size = 1;
        }
        if self.tui.page_size == 0 {
            log::warn!("tui.page_size must be at least 1, using 1");
            self.tui.page_size = 1;
        }
        if self.tui.tick_rate_ms == 0 {
            self.tui.tick_rate_ms = TuiConfig::default().tick_rate_ms;
        }
        self
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("pokedex").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("pokedex").join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.universe_size, 898);
        assert_eq!(config.api.batch_size, 50);
        assert_eq!(config.api.language, "en");
        assert!(config.api.timeout_secs.is_none());
        assert_eq!(config.tui.tick_rate_ms, 50);
        assert_eq!(config.tui.page_size, 24);
        assert_eq!(config.tui.default_view, ViewModeSetting::Grid);
        assert!(!config.tui.mouse_enabled);
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config.tui.page_size, 24);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbatch_size = 10\n\n[tui]\ndefault_view = \"list\"").unwrap();

        let config = AppConfig::load_from(file.path());
        assert_eq!(config.api.batch_size, 10);
        assert_eq!(config.api.universe_size, 898);
        assert_eq!(config.tui.default_view, ViewModeSetting::List);
        assert_eq!(config.tui.page_size, 24);
    }

    #[test]
    fn test_unparseable_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is = = not toml").unwrap();

        let config = AppConfig::load_from(file.path());
        assert_eq!(config.api.batch_size, 50);
    }

    #[test]
    fn test_sanitized_clamps_zero_sizes() {
        let mut config = AppConfig::default();
        config.api.batch_size = 0;
        config.api.universe_size = 0;
        config.tui.page_size = 0;
        config.tui.tick_rate_ms = 0;

        let config = config.sanitized();
        assert_eq!(config.api.batch_size, 1);
        assert_eq!(config.api.universe_size, 1);
        assert_eq!(config.tui.page_size, 1);
        assert_eq!(config.tui.tick_rate_ms, 50);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, config.api.base_url);
        assert_eq!(deserialized.tui.page_size, config.tui.page_size);
    }
}
