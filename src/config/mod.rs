pub mod loader;

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

// Global configuration instance with thread-safe access
pub static CONFIG: once_cell::sync::Lazy<Arc<RwLock<Config>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(Config::default())));

// Time to wait between checking for config file changes
const CONFIG_CHECK_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub controls: ControlsConfig,
    pub display: DisplayConfig,
    pub storage: StorageConfig,
    #[serde(skip)]
    last_checked: Option<Instant>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controls: ControlsConfig::default(),
            display: DisplayConfig::default(),
            storage: StorageConfig::default(),
            last_checked: Some(Instant::now()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Minimum gap between repeated horizontal moves while a direction key is held.
    pub horizontal_repeat_ms: u64,
    /// How often the host loop redraws and polls the drop timer.
    pub frame_interval_ms: u64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            horizontal_repeat_ms: 120,
            frame_interval_ms: 16,
        }
    }
}

impl ControlsConfig {
    #[must_use]
    pub fn horizontal_repeat(&self) -> Duration {
        Duration::from_millis(self.horizontal_repeat_ms)
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_next: bool,
    pub show_best: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_next: true,
            show_best: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Keep best stats on disk between runs.
    pub persist_best: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { persist_best: true }
    }
}

impl Config {
    /// Snapshot of the global configuration.
    #[must_use]
    pub fn current() -> Config {
        CONFIG
            .read()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    // Check if the config file changed and reload it if so. Returns whether it did.
    pub fn check_and_reload() -> bool {
        let now = Instant::now();
        let should_check = match CONFIG.read() {
            Ok(config) => config
                .last_checked
                .is_none_or(|last| now.duration_since(last) > CONFIG_CHECK_INTERVAL),
            Err(_) => false,
        };

        if !should_check {
            return false;
        }

        // Only a file whose modification time moved counts as a reload
        let reloaded = loader::load_changed_config_from_file().ok().flatten();
        if let Ok(mut config) = CONFIG.write() {
            match reloaded {
                Some(new_config) => {
                    *config = new_config;
                    config.last_checked = Some(now);
                    return true;
                }
                None => config.last_checked = Some(now),
            }
        }
        false
    }
}
