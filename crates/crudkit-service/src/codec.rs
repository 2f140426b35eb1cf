//! Conversion between entities and their JSON documents.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crudkit_core::error::{AppError, BoxError};
use crudkit_core::result::AppResult;

/// Function turning an entity into its JSON document.
pub type EncodeFn<E> = fn(&E) -> Result<Value, BoxError>;

/// Function rebuilding an entity from its JSON document.
pub type DecodeFn<E> = fn(Value) -> Result<E, BoxError>;

/// Explicit encode/decode pair for one entity type.
///
/// The patch pipeline only ever goes through these two functions, so an
/// entity can expose a JSON shape that differs from its serde
/// representation by passing hand-written functions to [`DocumentCodec::new`].
pub struct DocumentCodec<E> {
    encode: EncodeFn<E>,
    decode: DecodeFn<E>,
}

impl<E> DocumentCodec<E> {
    /// Create a codec from explicit conversion functions.
    pub fn new(encode: EncodeFn<E>, decode: DecodeFn<E>) -> Self {
        Self { encode, decode }
    }

    /// Convert an entity into its JSON document.
    pub fn encode(&self, entity: &E) -> AppResult<Value> {
        (self.encode)(entity)
            .map_err(|e| AppError::conversion("Failed to convert entity to json document", e))
    }

    /// Rebuild an entity from a JSON document.
    pub fn decode(&self, document: Value) -> AppResult<E> {
        (self.decode)(document)
            .map_err(|e| AppError::conversion("Failed to convert json document to entity", e))
    }
}

impl<E> DocumentCodec<E>
where
    E: Serialize + DeserializeOwned,
{
    /// Codec using the entity's serde implementation.
    pub fn serde() -> Self {
        Self::new(serde_encode::<E>, serde_decode::<E>)
    }
}

impl<E> Default for DocumentCodec<E>
where
    E: Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::serde()
    }
}

impl<E> Clone for DocumentCodec<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for DocumentCodec<E> {}

impl<E> fmt::Debug for DocumentCodec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCodec")
            .field("entity", &std::any::type_name::<E>())
            .finish()
    }
}

fn serde_encode<E: Serialize>(entity: &E) -> Result<Value, BoxError> {
    Ok(serde_json::to_value(entity)?)
}

fn serde_decode<E: DeserializeOwned>(document: Value) -> Result<E, BoxError> {
    Ok(serde_json::from_value(document)?)
}
