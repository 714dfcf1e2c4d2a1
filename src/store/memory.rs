use async_trait::async_trait;
use dashmap::DashMap;

use super::{ItemStore, StoreError};
use crate::models::{Item, item_id};

/// Process-local table, used for development and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: DashMap<String, Item>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.get(id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let id = item_id(&item)
            .ok_or_else(|| StoreError::Backend("item is missing a string `id` field".to_string()))?
            .to_string();
        self.items.insert(id, item);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.items.remove(id);
        Ok(())
    }
}
