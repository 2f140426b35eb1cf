//! # crudkit-database
//!
//! Entity store implementations for crudkit: an in-memory store for tests
//! and embedded use, and a PostgreSQL store keeping each entity as a JSONB
//! document.

pub mod connection;
pub mod memory;
pub mod postgres;

pub use connection::DatabasePool;
pub use memory::InMemoryRepository;
pub use postgres::PgDocumentRepository;
