pub mod memory;
pub mod spanner;

use async_trait::async_trait;

use crate::models::Item;

pub use memory::InMemoryStore;
pub use spanner::SpannerStore;

/// Failure of a single storage operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend itself rejected or failed the operation
    #[error("{0}")]
    Backend(String),
    /// Anything else on the way to or from the backend
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The key-value table behind the gateway.
///
/// Items are keyed by their `id` field. Every operation may fail; absence on
/// `get` is not a failure.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Return every stored item, in whatever order the backend yields them
    async fn scan(&self) -> Result<Vec<Item>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Insert or fully replace the item stored under its `id`
    async fn put(&self, item: Item) -> Result<(), StoreError>;

    /// Remove the item stored under `id`. Removing an unknown id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
