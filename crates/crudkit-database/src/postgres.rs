//! PostgreSQL entity store keeping each entity as a JSONB document.

use std::fmt::Write as _;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use crudkit_core::error::{AppError, ErrorKind};
use crudkit_core::result::AppResult;
use crudkit_core::traits::{Entity, Repository};
use crudkit_core::types::{Page, PageRequest};

/// Store backed by a table of the shape
/// `(id BIGSERIAL PRIMARY KEY, body JSONB NOT NULL)`.
///
/// The table is owned by the application; this store never creates or
/// alters it. The `id` column is authoritative: it overwrites whatever key
/// the stored body carries when an entity is read back.
///
/// Saving with an explicit key moves the `id` sequence past the largest
/// stored key, so later keyless saves never collide with it.
#[derive(Debug)]
pub struct PgDocumentRepository<E> {
    pool: PgPool,
    table: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PgDocumentRepository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> PgDocumentRepository<E> {
    /// Create a store over the given table.
    ///
    /// The table name may be schema-qualified (`schema.table`); each part
    /// must be a plain identifier.
    pub fn new(pool: PgPool, table: impl Into<String>) -> AppResult<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self {
            pool,
            table,
            _entity: PhantomData,
        })
    }

    /// The table this store reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl<E> Repository<E> for PgDocumentRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        let sql = format!("SELECT id, body FROM {} WHERE id = $1", self.table);
        let row = sqlx::query_as::<_, (i64, Value)>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find entity", e))?;

        row.map(|(id, body)| decode_row(id, body)).transpose()
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<Page<E>> {
        let sql = select_page_sql(&self.table, page)?;
        let rows = sqlx::query_as::<_, (i64, Value, i64)>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list entities", e))?;

        // The windowed count shares the page's snapshot. A page past the end
        // has no row to carry it.
        let total = match rows.first() {
            Some((_, _, total)) => (*total).max(0) as u64,
            None => self.count().await?,
        };

        let content = rows
            .into_iter()
            .map(|(id, body, _)| decode_row(id, body))
            .collect::<AppResult<Vec<E>>>()?;

        debug!(table = %self.table, total, returned = content.len(), "Listed entities");
        Page::new(content, total, page.clone())
    }

    async fn save(&self, mut entity: E) -> AppResult<E> {
        let body = serde_json::to_value(&entity)
            .map_err(|e| AppError::conversion("Failed to encode entity for storage", e))?;

        match entity.id() {
            Some(id) => {
                let mut tx = self.pool.begin().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
                })?;

                let sql = format!(
                    "INSERT INTO {} (id, body) VALUES ($1, $2) \
                     ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body",
                    self.table
                );
                sqlx::query(&sql)
                    .bind(id)
                    .bind(&body)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to update entity", e)
                    })?;

                if id > 0 {
                    sqlx::query(SYNC_SEQUENCE_SQL)
                        .bind(&self.table)
                        .bind(id)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to advance key sequence",
                                e,
                            )
                        })?;
                }

                tx.commit().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to commit entity", e)
                })?;
            }
            None => {
                let sql = format!("INSERT INTO {} (body) VALUES ($1) RETURNING id", self.table);
                let id: i64 = sqlx::query_scalar(&sql)
                    .bind(&body)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to insert entity", e)
                    })?;
                entity.set_id(id);
            }
        }

        Ok(entity)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete entity", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count entities", e))?;
        Ok(count.max(0) as u64)
    }
}

fn decode_row<E>(id: i64, body: Value) -> AppResult<E>
where
    E: Entity + DeserializeOwned,
{
    let mut entity: E = serde_json::from_value(body)
        .map_err(|e| AppError::conversion(format!("Failed to decode stored entity {id}"), e))?;
    entity.set_id(id);
    Ok(entity)
}

/// Build the page query. Sort fields compare as JSONB values, with the key
/// as the final tiebreaker so paging is stable. Every row carries the total
/// row count of the table.
fn select_page_sql(table: &str, page: &PageRequest) -> AppResult<String> {
    let mut sql = format!("SELECT id, body, COUNT(*) OVER () AS total FROM {table} ORDER BY ");
    for field in &page.sort {
        field.validate()?;
        // Infallible for String.
        let _ = write!(
            sql,
            "body->'{}' {}, ",
            field.field,
            field.direction.as_sql()
        );
    }
    sql.push_str("id ASC");

    if let Some(limit) = page.limit() {
        let _ = write!(sql, " LIMIT {limit} OFFSET {}", page.offset());
    }
    Ok(sql)
}

/// Move the `id` sequence of table `$1` up to key `$2`. Never moves it
/// backwards; tables without an owned sequence are left alone.
const SYNC_SEQUENCE_SQL: &str = "\
    SELECT setval(s.seq, GREATEST($2, COALESCE(pg_sequence_last_value(s.seq), 0))) \
    FROM (SELECT pg_get_serial_sequence($1, 'id')::regclass AS seq) AS s \
    WHERE s.seq IS NOT NULL";

fn validate_table_name(table: &str) -> AppResult<()> {
    let parts: Vec<&str> = table.split('.').collect();
    let valid = parts.len() <= 2
        && parts.iter().all(|part| {
            !part.is_empty()
                && !part.starts_with(|c: char| c.is_ascii_digit())
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid table name '{table}'")))
    }
}
