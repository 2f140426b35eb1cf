//! Core type definitions used across the crudkit workspace.

pub mod pagination;
pub mod sorting;

pub use pagination::{Page, PageRequest};
pub use sorting::{SortDirection, SortField};
