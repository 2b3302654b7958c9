use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::crypto::{self, CryptoError};
use crate::models::UserSettings;
use crate::records::{TestResult, TextReport};

/// Everything the application persists. Period starts serialize as an
/// ISO-8601 date array and settings as a JSON object, under the same
/// key names the web client used for its local storage, so an export
/// from either side round-trips into the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(rename = "menstrual-period-starts", default)]
    pub period_starts: Vec<NaiveDate>,
    #[serde(rename = "menstrual-user-settings", default)]
    pub settings: Option<UserSettings>,
    #[serde(default)]
    pub test_results: Vec<TestResult>,
    #[serde(default)]
    pub text_reports: Vec<TextReport>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("data directory not found")]
    NoDataDir,
}

/// Persistence boundary for the tracker. Injected rather than ambient,
/// so any backend can stand in; [`MemoryStore`] is the test fake.
pub trait CycleStore {
    /// `Ok(None)` means no state has ever been saved.
    fn load(&self) -> Result<Option<StoredState>, StoreError>;
    fn save(&self, state: &StoredState) -> Result<(), StoreError>;
    fn wipe(&self) -> Result<(), StoreError>;
}

impl<S: CycleStore> CycleStore for &S {
    fn load(&self) -> Result<Option<StoredState>, StoreError> {
        (**self).load()
    }

    fn save(&self, state: &StoredState) -> Result<(), StoreError> {
        (**self).save(state)
    }

    fn wipe(&self) -> Result<(), StoreError> {
        (**self).wipe()
    }
}

/// Encrypted file-backed store. The file lives under the platform data
/// directory by default and is sealed with the owner's passphrase.
pub struct VaultStore {
    path: PathBuf,
    passphrase: String,
}

impl VaultStore {
    /// Vault at the default platform location
    /// (`<data local dir>/arogya/vault.arogya`).
    pub fn open_default(passphrase: &str) -> Result<Self, StoreError> {
        let dir = dirs::data_local_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("arogya");
        fs::create_dir_all(&dir)?;
        Ok(Self::at_path(dir.join("vault.arogya"), passphrase))
    }

    /// Vault at an explicit path; used by tests and embedders that
    /// manage their own directories.
    pub fn at_path(path: PathBuf, passphrase: &str) -> Self {
        Self {
            path,
            passphrase: passphrase.to_owned(),
        }
    }

    /// Whether a vault file exists (i.e. the app has been set up).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Drop for VaultStore {
    fn drop(&mut self) {
        self.passphrase.zeroize();
    }
}

impl CycleStore for VaultStore {
    fn load(&self) -> Result<Option<StoredState>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let sealed = fs::read(&self.path)?;
        let plaintext = crypto::open(&self.passphrase, &sealed)?;
        let state: StoredState = serde_json::from_slice(&plaintext)?;
        tracing::debug!(path = %self.path.display(), "vault loaded");
        Ok(Some(state))
    }

    fn save(&self, state: &StoredState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let plaintext = serde_json::to_vec(state)?;
        let sealed = crypto::seal(&self.passphrase, &plaintext)?;
        fs::write(&self.path, sealed)?;
        tracing::debug!(path = %self.path.display(), "vault saved");
        Ok(())
    }

    fn wipe(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "vault wiped");
        }
        Ok(())
    }
}

/// In-memory store for tests and short-lived embedders.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<Option<StoredState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CycleStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredState>, StoreError> {
        let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, state: &StoredState) -> Result<(), StoreError> {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(state.clone());
        Ok(())
    }

    fn wipe(&self) -> Result<(), StoreError> {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> StoredState {
        StoredState {
            period_starts: vec![
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 29).unwrap(),
            ],
            settings: Some(UserSettings::default()),
            ..StoredState::default()
        }
    }

    #[test]
    fn vault_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = VaultStore::at_path(dir.path().join("vault.arogya"), "hunter2");
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());

        store.save(&sample_state()).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(sample_state()));

        store.wipe().unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn vault_rejects_wrong_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.arogya");
        VaultStore::at_path(path.clone(), "right")
            .save(&sample_state())
            .unwrap();

        let wrong = VaultStore::at_path(path, "wrong");
        assert!(matches!(wrong.load(), Err(StoreError::Crypto(_))));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample_state()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_state()));
        store.wipe().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    /// Dates must survive serialization exactly: date-only precision,
    /// no timezone drift.
    #[test]
    fn iso_dates_roundtrip_through_json() {
        let state = sample_state();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"menstrual-period-starts\":[\"2026-01-01\",\"2026-01-29\"]"));
        assert!(json.contains("\"menstrual-user-settings\""));

        let back: StoredState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.period_starts, state.period_starts);
    }

    #[test]
    fn missing_record_fields_default_on_load() {
        // A document written by the web client carries only the two
        // local-storage keys.
        let json = r#"{
            "menstrual-period-starts": ["2026-01-01"],
            "menstrual-user-settings": {"averageCycleLength": 30, "averagePeriodLength": 6}
        }"#;
        let state: StoredState = serde_json::from_str(json).unwrap();
        assert_eq!(state.period_starts.len(), 1);
        assert_eq!(state.settings.unwrap().average_cycle_length, 30);
        assert!(state.test_results.is_empty());
    }
}
