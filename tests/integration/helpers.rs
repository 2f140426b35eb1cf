//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crudkit::prelude::*;

/// Sample entity used across the integration tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Article {
    pub fn new(name: &str, tags: &[&str]) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            summary: None,
        }
    }
}

impl Entity for Article {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// Outward-facing view of an [`Article`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDto {
    pub id: i64,
    pub title: String,
    pub tag_count: usize,
}

impl TryFrom<Article> for ArticleDto {
    type Error = String;

    fn try_from(article: Article) -> Result<Self, Self::Error> {
        let id = article
            .id
            .ok_or_else(|| format!("article '{}' has no key", article.name))?;
        Ok(Self {
            id,
            title: article.name,
            tag_count: article.tags.len(),
        })
    }
}

/// Repository wrapper recording every entity handed to `save`.
pub struct RecordingRepository<E> {
    inner: InMemoryRepository<E>,
    saves: Mutex<Vec<E>>,
}

impl<E: Clone> RecordingRepository<E> {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRepository::new(),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Entities passed to `save`, oldest first.
    pub fn saves(&self) -> Vec<E> {
        self.saves.lock().unwrap().clone()
    }

    /// Forget recorded saves, e.g. after seeding.
    pub fn reset(&self) {
        self.saves.lock().unwrap().clear();
    }
}

#[async_trait]
impl<E> Repository<E> for RecordingRepository<E>
where
    E: Entity + Clone + Serialize,
{
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<Page<E>> {
        self.inner.find_all(page).await
    }

    async fn save(&self, entity: E) -> AppResult<E> {
        self.saves.lock().unwrap().push(entity.clone());
        self.inner.save(entity).await
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        self.inner.delete_by_id(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }
}

/// Test context: a service over a recording store.
pub struct TestApp {
    pub repo: Arc<RecordingRepository<Article>>,
    pub service: EntityService<Article, RecordingRepository<Article>>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(DeletePolicy::Idempotent)
    }

    pub fn with_policy(policy: DeletePolicy) -> Self {
        let repo = Arc::new(RecordingRepository::new());
        let service = EntityService::new(Arc::clone(&repo), DocumentCodec::serde())
            .with_delete_policy(policy);
        Self { repo, service }
    }

    /// Create the given articles and clear the recorded saves.
    pub async fn seed(&self, articles: Vec<Article>) -> Vec<Article> {
        let mut created = Vec::with_capacity(articles.len());
        for article in articles {
            created.push(self.service.create(article).await.expect("seed article"));
        }
        self.repo.reset();
        created
    }
}
