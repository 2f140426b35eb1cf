//! # crudkit-service
//!
//! Generic service layer for crudkit. [`EntityService`] offers lookup,
//! paginated listing, creation, deletion and JSON Patch partial updates
//! for any entity type over any [`Repository`](crudkit_core::Repository).
//! The [`mapper`] module turns pages of entities into pages of DTOs.
//!
//! Services follow constructor injection: the store is handed in as an
//! `Arc`, the entity's document conversion as explicit function values.

pub mod codec;
pub mod mapper;
pub mod patch;
pub mod service;

pub use codec::DocumentCodec;
pub use mapper::{map_page, map_page_with};
pub use patch::{JsonPatchApplier, Patch, PatchApplier, parse_patch, patch_from_value};
pub use service::EntityService;
