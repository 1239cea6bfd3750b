//! Outbound adapters implementing the document store port.
//!
//! - **memory**: process-local store for development runs and tests
//! - **persistence**: PostgreSQL JSONB store using Diesel
//!
//! Adapters translate between domain documents and their storage
//! representation and contain no business logic.

pub mod memory;
pub mod persistence;
