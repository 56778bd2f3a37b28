mod config;
pub mod database;
pub mod memory;

pub use config::{Config, RewardsConfig, StabilityConfig, StorageConfig};
pub use database::Database;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::StoreError;

/// Synchronous, client-local string key-value backend.
///
/// Every persisted document (progress record, settings, quests, journal)
/// lives under one key as a JSON string. Writes are last-write-wins.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Load a JSON document, falling back to `T::default()` when the key is
/// absent, unreadable or does not parse.
pub fn load_document<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored document is unreadable, using defaults");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "backend read failed, using defaults");
            T::default()
        }
    }
}

/// Serialize `doc` as JSON and write it under `key`.
pub fn save_document<T, S>(store: &S, key: &str, doc: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(doc).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// Returns the data directory.
///
/// `KORA_DATA_DIR` wins when set. Otherwise `~/.config/orbital-kora[-dev]/`,
/// with the `-dev` suffix selected by `KORA_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("KORA_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("KORA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("orbital-kora-dev")
            } else {
                base_dir.join("orbital-kora")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
