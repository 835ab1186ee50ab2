// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use propchange_core::config::{ConfigError, ConfigStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory implementation of [`ConfigStore`] for testing.
///
/// Clones share state, so a test can hand one clone to a service and inspect
/// the other.
///
/// # Example
///
/// ```
/// use propchange_dry_tests::InMemoryConfigStore;
/// use propchange_core::config::ConfigService;
/// use propchange_core::prefs::RepairPrefs;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.save(RepairPrefs::KEY, &RepairPrefs::default()).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key(RepairPrefs::KEY));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryConfigStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `key -> data`.
    pub fn with_entry(key: &str, data: &[u8]) -> Self {
        let store = Self::new();
        store
            .lock()
            .data
            .insert(key.to_owned(), data.to_vec());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every `load_raw` fail.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Make every `save_raw` fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// `load_raw` attempts, including failed ones.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// `save_raw` attempts, including failed ones.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Whether `key` holds a blob.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.load_count += 1;
        if inner.fail_on_load {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.save_count += 1;
        if inner.fail_on_save {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propchange_core::config::ConfigService;
    use propchange_core::prefs::RepairPrefs;

    #[test]
    fn counts_attempts_including_failures() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(store.save_raw("k", b"v").is_err());
        store.set_fail_on_save(false);
        store.save_raw("k", b"v").unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load_raw("k").unwrap(), b"v");
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn failing_load_degrades_to_default_prefs() {
        let store = InMemoryConfigStore::with_entry(RepairPrefs::KEY, br#"{"workspace":"stage"}"#);
        let service = ConfigService::new(store.clone());
        assert_eq!(
            service.load_or_default::<RepairPrefs>(RepairPrefs::KEY).workspace,
            "stage"
        );
        store.set_fail_on_load(true);
        assert_eq!(
            service.load_or_default::<RepairPrefs>(RepairPrefs::KEY),
            RepairPrefs::default()
        );
    }
}
