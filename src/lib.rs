//! # crudkit
//!
//! Generic helpers for building CRUD services: an entity service with
//! JSON Patch partial updates, page mapping into DTOs, pagination types,
//! entity stores, and a unified error type.
//!
//! This crate re-exports the workspace crates so applications depend on a
//! single package.

pub use crudkit_core;
pub use crudkit_database;
pub use crudkit_service;

/// Commonly used items.
pub mod prelude {
    pub use crudkit_core::config::{AppConfig, DeletePolicy, ServiceConfig};
    pub use crudkit_core::{
        AppError, AppResult, Entity, ErrorKind, Page, PageRequest, Repository, SortDirection,
        SortField,
    };
    pub use crudkit_database::{DatabasePool, InMemoryRepository, PgDocumentRepository};
    pub use crudkit_service::{
        DocumentCodec, EntityService, JsonPatchApplier, Patch, PatchApplier, map_page,
        map_page_with, parse_patch, patch_from_value,
    };
}
