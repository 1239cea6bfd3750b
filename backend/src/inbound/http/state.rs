//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BranchService, DocumentStore, EmployeeService};
use crate::domain::{DocumentBranchService, DocumentEmployeeService, DocumentRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub branches: Arc<dyn BranchService>,
    pub employees: Arc<dyn EmployeeService>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(branches: Arc<dyn BranchService>, employees: Arc<dyn EmployeeService>) -> Self {
        Self {
            branches,
            employees,
        }
    }

    /// Wire the document-backed services over one store.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use workforce::inbound::http::state::HttpState;
    /// use workforce::outbound::memory::InMemoryDocumentStore;
    ///
    /// let state = HttpState::from_store(Arc::new(InMemoryDocumentStore::default()));
    /// let _branches = state.branches.clone();
    /// ```
    pub fn from_store(store: Arc<dyn DocumentStore>) -> Self {
        let repository = DocumentRepository::new(store);
        Self::new(
            Arc::new(DocumentBranchService::new(repository.clone())),
            Arc::new(DocumentEmployeeService::new(repository)),
        )
    }
}
