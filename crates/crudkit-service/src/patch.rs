//! RFC 6902 JSON Patch application.

use serde_json::Value;

use crudkit_core::error::AppError;
use crudkit_core::result::AppResult;

pub use json_patch::{Patch, PatchOperation};

/// Applies a patch to a JSON document.
///
/// Application is all-or-nothing: on error the caller gets no document
/// back, so a partially patched tree can never reach the store.
pub trait PatchApplier: Send + Sync + 'static {
    /// Apply every operation of `patch` to `document`, in order.
    fn apply(&self, document: Value, patch: &Patch) -> AppResult<Value>;
}

/// [`PatchApplier`] backed by the `json-patch` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPatchApplier;

impl PatchApplier for JsonPatchApplier {
    fn apply(&self, mut document: Value, patch: &Patch) -> AppResult<Value> {
        json_patch::patch(&mut document, &patch.0)
            .map_err(|e| AppError::patch("Failed to apply json patch", e))?;
        Ok(document)
    }
}

/// Parse a patch from its JSON text.
pub fn parse_patch(source: &str) -> AppResult<Patch> {
    serde_json::from_str(source).map_err(|e| AppError::patch("Malformed json patch", e))
}

/// Build a patch from an already parsed JSON array.
pub fn patch_from_value(value: Value) -> AppResult<Patch> {
    serde_json::from_value(value).map_err(|e| AppError::patch("Malformed json patch", e))
}
