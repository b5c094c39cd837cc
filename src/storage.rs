#![warn(clippy::all, clippy::pedantic)]

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::components::BestStats;

// Fallback location when no user config directory is available
const BEST_FILE_PATH: &str = "blockfall-best.toml";

/// Persistence for the best finished session. Failures are reported to the
/// caller, which keeps playing with whatever it already has.
pub trait BestStore: Send + Sync {
    fn load(&self) -> Result<BestStats, StorageError>;
    fn save(&self, stats: &BestStats) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

impl<T: BestStore + ?Sized> BestStore for Arc<T> {
    fn load(&self) -> Result<BestStats, StorageError> {
        (**self).load()
    }

    fn save(&self, stats: &BestStats) -> Result<(), StorageError> {
        (**self).save(stats)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// Keeps best stats in a TOML file.
#[derive(Debug, Clone)]
pub struct TomlBestStore {
    path: PathBuf,
}

impl TomlBestStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at `BLOCKFALL_BEST` if set, otherwise in the user's config directory.
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(default_best_file_path())
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl BestStore for TomlBestStore {
    fn load(&self) -> Result<BestStats, StorageError> {
        if !self.path.exists() {
            debug!("No best stats at {}", self.path.display());
            return Ok(BestStats::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn save(&self, stats: &BestStats) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let toml_string = toml::to_string_pretty(stats)?;
        fs::write(&self.path, toml_string)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process store, used when persistence is disabled and in tests.
#[derive(Debug, Default)]
pub struct MemoryBestStore {
    stats: Mutex<Option<BestStats>>,
}

impl MemoryBestStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stats(stats: BestStats) -> Self {
        Self {
            stats: Mutex::new(Some(stats)),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<BestStats>>, StorageError> {
        self.stats.lock().map_err(|_| StorageError::Unavailable)
    }
}

impl BestStore for MemoryBestStore {
    fn load(&self) -> Result<BestStats, StorageError> {
        Ok(self.slot()?.unwrap_or_default())
    }

    fn save(&self, stats: &BestStats) -> Result<(), StorageError> {
        *self.slot()? = Some(*stats);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot()? = None;
        Ok(())
    }
}

fn default_best_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("BLOCKFALL_BEST") {
        return PathBuf::from(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("blockfall").join("best.toml")
    } else {
        PathBuf::from(BEST_FILE_PATH)
    }
}

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Unavailable,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "best stats i/o error: {err}"),
            StorageError::Parse(err) => write!(f, "best stats file is malformed: {err}"),
            StorageError::Serialize(err) => write!(f, "could not encode best stats: {err}"),
            StorageError::Unavailable => write!(f, "best stats store is unavailable"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<toml::de::Error> for StorageError {
    fn from(err: toml::de::Error) -> Self {
        StorageError::Parse(err)
    }
}

impl From<toml::ser::Error> for StorageError {
    fn from(err: toml::ser::Error) -> Self {
        StorageError::Serialize(err)
    }
}
