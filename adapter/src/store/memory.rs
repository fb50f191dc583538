use super::naming::{generate_name, is_valid_name};
use super::MissionStore;
use anyhow::{anyhow, bail};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// In-process store for tests and runs that must not touch the disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, (Instant, Vec<u8>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MissionStore for MemoryStore {
    fn put(&self, document: &[u8]) -> anyhow::Result<String> {
        let name = generate_name();
        self.entries
            .write()
            .map_err(|_| anyhow!("mission store lock poisoned"))?
            .insert(name.clone(), (Instant::now(), document.to_vec()));
        Ok(name)
    }

    fn take(&self, name: &str) -> anyhow::Result<Option<Vec<u8>>> {
        if !is_valid_name(name) {
            bail!("invalid mission name {:?}", name);
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("mission store lock poisoned"))?;
        Ok(entries.remove(name).map(|(_, bytes)| bytes))
    }

    fn expire(&self, max_age: Duration) -> anyhow::Result<usize> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("mission store lock poisoned"))?;
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < max_age);
        Ok(before - entries.len())
    }
}
