//! Persistence for the scoring engine.
//!
//! The engine only talks to the abstract [`KeyValueStore`]. Values are JSON
//! strings; [`read_json`] and [`encode_json`] do the typed conversion.

mod config;
pub mod database;
pub mod memory;

pub use config::{Config, DecayConfig, HistoryConfig, RulesConfig, SleepConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::tools::ToolId;

/// Storage keys used by the engine.
pub mod keys {
    use crate::tools::ToolId;

    pub const EPC_SCORES: &str = "epc_scores";
    pub const LAST_DECAY_TIMESTAMP: &str = "last_decay_timestamp";
    pub const ENERGY_BUFFER: &str = "energy_buffer";
    pub const SCORE_TAILS: &str = "score_tails";
    pub const BURNOUT_HISTORY: &str = "burnout_history";
    pub const DAILY_ACTIVITY: &str = "daily_activity";
    pub const TOOL_USAGE_PREFIX: &str = "tool_usage:";

    pub fn tool_usage(tool: ToolId) -> String {
        format!("{TOOL_USAGE_PREFIX}{}", tool.as_str())
    }
}

/// Abstract persistent key-value store.
///
/// Each single-key operation is atomic. `multi_set` and `multi_remove` are
/// all-or-nothing.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        keys.iter()
            .map(|k| Ok((k.to_string(), self.get(k)?)))
            .collect()
    }

    fn multi_set(&self, entries: &[(String, String)]) -> Result<(), StorageError>;

    fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        (**self).multi_get(keys)
    }

    fn multi_set(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        (**self).multi_set(entries)
    }

    fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).multi_remove(keys)
    }
}

/// Read and decode a JSON value. Missing keys are `Ok(None)`.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => decode_json(key, &raw).map(Some),
        None => Ok(None),
    }
}

pub fn decode_json<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Encode a value as a `(key, json)` pair ready for `multi_set`.
pub fn encode_json<T: Serialize>(key: &str, value: &T) -> Result<(String, String), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok((key.to_string(), json))
}

/// Every key the engine may have written.
pub fn all_engine_keys() -> Vec<String> {
    let mut all = vec![
        keys::EPC_SCORES.to_string(),
        keys::LAST_DECAY_TIMESTAMP.to_string(),
        keys::ENERGY_BUFFER.to_string(),
        keys::SCORE_TAILS.to_string(),
        keys::BURNOUT_HISTORY.to_string(),
        keys::DAILY_ACTIVITY.to_string(),
    ];
    all.extend(ToolId::ALL.iter().map(|t| keys::tool_usage(*t)));
    all
}

/// Returns the data directory.
///
/// `EPC_DATA_DIR` wins if set. Otherwise `~/.config/epc[-dev]/`, where the
/// `-dev` suffix is selected with `EPC_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("EPC_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("EPC_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("epc-dev")
            } else {
                base_dir.join("epc")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
