//! Generic repository trait for entity stores.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::entity::Entity;
use crate::types::pagination::{Page, PageRequest};

/// Generic key-value entity store.
///
/// Implementations decide how entities are laid out and how sorting is
/// applied; callers only see whole entities keyed by `i64`. `save` is a
/// full replace: it inserts entities without a key (assigning one) and
/// overwrites the stored entity otherwise.
#[async_trait]
pub trait Repository<E>: Send + Sync + 'static
where
    E: Entity,
{
    /// Find an entity by its key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>>;

    /// Find all entities with pagination.
    async fn find_all(&self, page: &PageRequest) -> AppResult<Page<E>>;

    /// Insert or replace an entity and return the stored version.
    async fn save(&self, entity: E) -> AppResult<E>;

    /// Delete an entity by its key. Returns `true` if an entity was removed.
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;

    /// Count total entities.
    async fn count(&self) -> AppResult<u64>;

    /// Check whether an entity with the given key exists.
    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
