//! In-process key-value store for previews, offline sessions and tests

use super::store::{BlobUpdate, KeyValueStore};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    async fn update(&self, key: &str, apply: BlobUpdate) -> anyhow::Result<()> {
        // The entry guard holds the shard lock until the new value is in place
        match self.values.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let next = apply(Some(occupied.get().clone()))?;
                occupied.insert(next);
            }
            Entry::Vacant(vacant) => {
                let next = apply(None)?;
                vacant.insert(next);
            }
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
