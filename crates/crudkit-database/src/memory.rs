//! In-memory entity store.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crudkit_core::error::AppError;
use crudkit_core::result::AppResult;
use crudkit_core::traits::{Entity, Repository};
use crudkit_core::types::{Page, PageRequest, SortDirection, SortField};

/// Store keeping entities in a key-ordered map.
///
/// Keys are assigned from a counter that always stays ahead of the largest
/// key saved so far. Unsorted listings come back in key order; sorted
/// listings compare the named top-level fields of each entity's JSON form.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    /// Stored entities by key.
    entities: RwLock<BTreeMap<i64, E>>,
    /// Last key handed out or seen.
    sequence: AtomicI64,
}

impl<E> InMemoryRepository<E> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(0),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity + Clone + Serialize,
{
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        Ok(self.entities.read().await.get(&id).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<Page<E>> {
        for field in &page.sort {
            field.validate()?;
        }

        let entities = self.entities.read().await;
        let total = entities.len() as u64;
        let mut rows: Vec<E> = entities.values().cloned().collect();
        drop(entities);

        if !page.sort.is_empty() {
            rows = sort_entities(rows, &page.sort)?;
        }

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = page
            .limit()
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        let content: Vec<E> = rows.into_iter().skip(offset).take(limit).collect();

        debug!(total, returned = content.len(), "Listed in-memory entities");
        Page::new(content, total, page.clone())
    }

    async fn save(&self, mut entity: E) -> AppResult<E> {
        let id = match entity.id() {
            Some(id) => {
                self.sequence.fetch_max(id, AtomicOrdering::SeqCst);
                id
            }
            None => {
                let last = self
                    .sequence
                    .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |last| {
                        last.checked_add(1)
                    })
                    .map_err(|_| AppError::internal("Key space exhausted"))?;
                let id = last + 1;
                entity.set_id(id);
                id
            }
        };

        self.entities.write().await.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.entities.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.entities.read().await.len() as u64)
    }
}

/// Sort entities by the given fields of their JSON form.
fn sort_entities<E: Serialize>(rows: Vec<E>, sort: &[SortField]) -> AppResult<Vec<E>> {
    let mut keyed = rows
        .into_iter()
        .map(|entity| {
            let document = serde_json::to_value(&entity).map_err(|e| {
                AppError::conversion("Failed to convert entity to json document", e)
            })?;
            let keys: Vec<Value> = sort
                .iter()
                .map(|s| document.get(&s.field).cloned().unwrap_or(Value::Null))
                .collect();
            Ok((keys, entity))
        })
        .collect::<AppResult<Vec<_>>>()?;

    // Stable: ties keep key order.
    keyed.sort_by(|(a, _), (b, _)| {
        sort.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(field, (x, y))| match field.direction {
                SortDirection::Asc => compare_values(x, y),
                SortDirection::Desc => compare_values(y, x),
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    Ok(keyed.into_iter().map(|(_, entity)| entity).collect())
}

/// Total order over JSON values: null, booleans, numbers, strings, then
/// arrays and objects by their serialized text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.total_cmp(&y)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}
