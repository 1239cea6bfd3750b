//! PostgreSQL persistence adapter using Diesel.
//!
//! Documents of every collection live in one JSONB table, accessed through
//! `diesel-async` with `bb8` pooling. Row structs and the table definition
//! are internal; only the store, the pool and the migration runner are
//! exported.

mod diesel_document_store;
mod migrations;
mod models;
mod pool;
mod schema;
mod store_error_mapping;

pub use diesel_document_store::DieselDocumentStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
