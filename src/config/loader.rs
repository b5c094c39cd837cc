#![warn(clippy::all, clippy::pedantic)]

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use once_cell::sync::Lazy;

use super::Config;

// Default config file path
const CONFIG_FILE_PATH: &str = "config/blockfall.toml";

// Modification time and contents of the last config read or written, per path
static LAST_LOADED: Lazy<Mutex<HashMap<PathBuf, (SystemTime, Config)>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

// Load the configuration from the file system
pub fn load_config_from_file() -> Result<Config, ConfigError> {
    load_config_from(&get_config_file_path())
}

// Load the configuration only if the file changed since it was last read or written
pub fn load_changed_config_from_file() -> Result<Option<Config>, ConfigError> {
    load_changed_config_from(&get_config_file_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    let (config, _changed) = read_config(config_path)?;
    Ok(config)
}

/// `None` when the file still has the modification time of the last load or save.
pub fn load_changed_config_from(config_path: &Path) -> Result<Option<Config>, ConfigError> {
    let (config, changed) = read_config(config_path)?;
    Ok(changed.then_some(config))
}

// Returns the config and whether it came from a fresh read of the file
fn read_config(config_path: &Path) -> Result<(Config, bool), ConfigError> {
    // Create default config directory if it doesn't exist
    create_parent_dir(config_path)?;

    // Check if config file exists
    if !config_path.exists() {
        // Create default config file if it doesn't exist
        let default_config = Config::default();
        save_config_to(config_path, &default_config)?;
        return Ok((default_config, true));
    }

    // Check if file has been modified
    let metadata = fs::metadata(config_path)?;
    let last_modified = metadata.modified()?;

    {
        let last_loaded = LAST_LOADED.lock().map_err(|_| ConfigError::Poisoned)?;
        if let Some((modified, config)) = last_loaded.get(config_path) {
            if *modified == last_modified {
                // File hasn't changed, return the config we already have
                return Ok((config.clone(), false));
            }
        }
    }

    // Read and parse config file
    let mut file = fs::File::open(config_path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let config: Config = toml::from_str(&contents)?;
    remember(config_path, last_modified, &config)?;
    Ok((config, true))
}

pub fn save_config_to(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    // Create parent directory if it doesn't exist
    create_parent_dir(config_path)?;

    // Serialize config to TOML
    let toml_string = toml::to_string_pretty(config)?;

    // Write to file
    fs::write(config_path, toml_string)?;

    // Update last modified time
    let metadata = fs::metadata(config_path)?;
    remember(config_path, metadata.modified()?, config)
}

fn create_parent_dir(config_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn remember(config_path: &Path, modified: SystemTime, config: &Config) -> Result<(), ConfigError> {
    let mut last_loaded = LAST_LOADED.lock().map_err(|_| ConfigError::Poisoned)?;
    last_loaded.insert(config_path.to_path_buf(), (modified, config.clone()));
    Ok(())
}

// Get the path to the config file
fn get_config_file_path() -> PathBuf {
    // Check for environment variable override
    if let Ok(path) = std::env::var("BLOCKFALL_CONFIG") {
        return PathBuf::from(path);
    }

    // Otherwise use default path in user's config directory
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("blockfall").join("config.toml")
    } else {
        // Fallback to local directory
        PathBuf::from(CONFIG_FILE_PATH)
    }
}

// Custom error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Poisoned,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config i/o error: {err}"),
            ConfigError::Parse(err) => write!(f, "config file is malformed: {err}"),
            ConfigError::Serialize(err) => write!(f, "could not encode config: {err}"),
            ConfigError::Poisoned => write!(f, "config state lock was poisoned"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
