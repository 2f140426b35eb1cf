//! # crudkit-core
//!
//! Core crate for crudkit. Contains the store and entity traits,
//! configuration schemas, pagination/sorting types, tracing setup,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other crudkit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use traits::{Entity, Repository};
pub use types::{Page, PageRequest, SortDirection, SortField};
