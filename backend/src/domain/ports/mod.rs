//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod branch_service;
mod document_store;
mod employee_service;

#[cfg(test)]
pub use branch_service::MockBranchService;
pub use branch_service::BranchService;
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{
    CommitRequest, DocumentStore, Precondition, ReadCheck, StagedWrite, StoreError,
};
#[cfg(test)]
pub use employee_service::MockEmployeeService;
pub use employee_service::EmployeeService;
