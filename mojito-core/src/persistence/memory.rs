// File: mojito-core/src/persistence/memory.rs

use std::collections::HashMap;

use parking_lot::Mutex;

use mojito_common::traits::SessionStorage;
use crate::Error;

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of batch operations applied so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl SessionStorage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), Error> {
        let mut map = self.entries.lock();
        for (k, v) in entries {
            map.insert(k.to_string(), v.to_string());
        }
        *self.writes.lock() += 1;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), Error> {
        let mut map = self.entries.lock();
        for k in keys {
            map.remove(*k);
        }
        *self.writes.lock() += 1;
        Ok(())
    }
}
