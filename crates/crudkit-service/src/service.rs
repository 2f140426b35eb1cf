//! Generic entity service: lookup, listing, creation, deletion and
//! JSON Patch partial updates.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crudkit_core::config::{DeletePolicy, ServiceConfig};
use crudkit_core::error::AppError;
use crudkit_core::result::AppResult;
use crudkit_core::traits::{Entity, Repository};
use crudkit_core::types::{Page, PageRequest};

use crate::codec::DocumentCodec;
use crate::patch::{JsonPatchApplier, Patch, PatchApplier};

/// CRUD operations for one entity type over a repository.
///
/// The service is stateless between calls and holds the store behind an
/// `Arc`, so one instance can serve any number of concurrent callers.
/// Concurrency guarantees are the store's: a patch reads a snapshot, edits
/// it, and writes the whole entity back, so a write that lands between the
/// read and the save is overwritten.
#[derive(Debug)]
pub struct EntityService<E, R, A = JsonPatchApplier> {
    /// Backing store.
    repository: Arc<R>,
    /// Entity/document conversion used by [`patch`](Self::patch).
    codec: DocumentCodec<E>,
    /// Patch engine.
    applier: A,
    /// How deleting a missing key is reported.
    delete_policy: DeletePolicy,
}

impl<E, R> EntityService<E, R>
where
    E: Entity,
    R: Repository<E>,
{
    /// Creates a new entity service with the default patch engine and an
    /// idempotent delete.
    pub fn new(repository: Arc<R>, codec: DocumentCodec<E>) -> Self {
        Self {
            repository,
            codec,
            applier: JsonPatchApplier,
            delete_policy: DeletePolicy::default(),
        }
    }

    /// Creates a new entity service honouring the given configuration.
    pub fn from_config(
        repository: Arc<R>,
        codec: DocumentCodec<E>,
        config: &ServiceConfig,
    ) -> Self {
        Self::new(repository, codec).with_delete_policy(config.delete_policy)
    }
}

impl<E, R, A> EntityService<E, R, A>
where
    E: Entity,
    R: Repository<E>,
    A: PatchApplier,
{
    /// Replace the patch engine.
    pub fn with_applier<B: PatchApplier>(self, applier: B) -> EntityService<E, R, B> {
        EntityService {
            repository: self.repository,
            codec: self.codec,
            applier,
            delete_policy: self.delete_policy,
        }
    }

    /// Set how deleting a missing key is reported.
    pub fn with_delete_policy(mut self, delete_policy: DeletePolicy) -> Self {
        self.delete_policy = delete_policy;
        self
    }

    /// The backing store.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Finds the entity with the given key.
    ///
    /// Fails with `NotFound` if the store has no such entity.
    pub async fn find_by_id(&self, id: i64) -> AppResult<E> {
        debug!(entity = entity_name::<E>(), entity_id = id, "Finding entity");
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<E>(id))
    }

    /// Returns one page of entities.
    ///
    /// Filtering and sorting are the store's business; the returned page
    /// carries the caller's request unchanged.
    pub async fn list(&self, page: &PageRequest) -> AppResult<Page<E>> {
        let (content, total, _) = self.repository.find_all(page).await?.into_parts();
        debug!(
            entity = entity_name::<E>(),
            total,
            returned = content.len(),
            "Listed entities"
        );
        Page::new(content, total, page.clone())
    }

    /// Persists a new entity and returns the stored version, which carries
    /// the key the store assigned.
    pub async fn create(&self, entity: E) -> AppResult<E> {
        let created = self.repository.save(entity).await?;
        info!(
            entity = entity_name::<E>(),
            entity_id = ?created.id(),
            "Entity created"
        );
        Ok(created)
    }

    /// Deletes the entity with the given key.
    ///
    /// A missing key is a silent success under [`DeletePolicy::Idempotent`]
    /// and a `NotFound` error under [`DeletePolicy::Strict`].
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let removed = self.repository.delete_by_id(id).await?;

        if !removed && self.delete_policy == DeletePolicy::Strict {
            return Err(not_found::<E>(id));
        }

        info!(entity = entity_name::<E>(), entity_id = id, removed, "Entity deleted");
        Ok(())
    }

    /// Applies a JSON Patch to the entity with the given key and saves the
    /// result as a full replacement.
    ///
    /// Nothing is written unless every step succeeds: a missing entity
    /// fails with `NotFound`, a conversion in either direction with
    /// `Conversion`, and any failing patch operation with `Patch`. A patch
    /// that changes the entity's key is rejected with `Validation`.
    pub async fn patch(&self, id: i64, patch: &Patch) -> AppResult<E> {
        let entity = self.find_by_id(id).await?;
        let patched = self.apply_patch(id, &entity, patch)?;
        let saved = self.repository.save(patched).await?;

        info!(
            entity = entity_name::<E>(),
            entity_id = id,
            operations = patch.0.len(),
            "Entity patched"
        );
        Ok(saved)
    }

    /// Round-trips `target` through its JSON document with `patch` applied.
    fn apply_patch(&self, id: i64, target: &E, patch: &Patch) -> AppResult<E> {
        let document = self.codec.encode(target)?;
        let patched = self.applier.apply(document, patch).inspect_err(|e| {
            warn!(entity = entity_name::<E>(), entity_id = id, error = %e, "Patch rejected");
        })?;
        let mut entity = self.codec.decode(patched)?;

        match entity.id() {
            Some(new_id) if new_id != id => {
                warn!(
                    entity = entity_name::<E>(),
                    entity_id = id,
                    new_id,
                    "Patch tried to change the entity key"
                );
                return Err(AppError::validation(format!(
                    "Patch must not change the key of {} {id}",
                    entity_name::<E>()
                )));
            }
            Some(_) => {}
            None => entity.set_id(id),
        }

        Ok(entity)
    }
}

impl<E, R, A: Clone> Clone for EntityService<E, R, A> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            codec: self.codec,
            applier: self.applier.clone(),
            delete_policy: self.delete_policy,
        }
    }
}

fn not_found<E>(id: i64) -> AppError {
    AppError::not_found(format!("{} {id} not found", entity_name::<E>()))
}

/// Short type name of the entity, used in messages and log fields.
fn entity_name<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
