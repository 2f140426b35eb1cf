//! Core traits defined in `crudkit-core` and implemented by other crates.

pub mod entity;
pub mod repository;

pub use entity::Entity;
pub use repository::Repository;
