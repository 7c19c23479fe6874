//! Client-side storage shared with other page components.
//!
//! The widget persists the chosen language under [`keys::LANG`] and reads
//! the theme under [`keys::THEME`]. Other components may change either at
//! any time; they announce it with a [`StorageEvent`] or an
//! [`ExternalMessage`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Active assistant language code.
    pub const LANG: &str = "lang";
    /// Document theme, `"light"` or `"dark"`.
    pub const THEME: &str = "theme";
}

/// Errors persisting client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not a JSON object of strings: {0}")]
    Format(#[from] serde_json::Error),
}

/// Key/value storage, shaped like a browser's local storage.
pub trait ClientStorage {
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value could not be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// A key changed outside the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
}

/// Cross-frame message understood by the widget.
///
/// Wire form is `{"type": "setLang", "value": "fr"}` or
/// `{"type": "setTheme"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ExternalMessage {
    #[serde(rename = "setLang")]
    SetLang { value: String },
    #[serde(rename = "setTheme")]
    SetTheme,
}

impl ExternalMessage {
    /// Parse a message, ignoring anything unrecognized.
    #[must_use]
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// In-process storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage persisted as a flat JSON object in a file.
///
/// Other processes may edit the file; [`JsonFileStorage::reload`] reports
/// which keys they changed.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Open `path`, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = read_values(&path)?;
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and report every key whose value changed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be read or parsed; the
    /// in-memory values are kept in that case.
    pub fn reload(&mut self) -> Result<Vec<StorageEvent>, StorageError> {
        let fresh = read_values(&self.path)?;

        let mut changed: Vec<StorageEvent> = fresh
            .iter()
            .filter(|(key, value)| self.values.get(*key) != Some(*value))
            .map(|(key, _)| StorageEvent { key: key.clone() })
            .collect();
        changed.extend(
            self.values
                .keys()
                .filter(|key| !fresh.contains_key(*key))
                .map(|key| StorageEvent { key: key.clone() }),
        );

        self.values = fresh;
        Ok(changed)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ClientStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.persist()
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}
