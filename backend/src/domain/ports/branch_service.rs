//! Driving port for branch use-cases.
//!
//! HTTP handlers depend on this trait rather than on the repository, so tests
//! can substitute a mock and the document store stays an outbound concern.

use async_trait::async_trait;

use crate::domain::{Branch, BranchPatch, Error, NewBranch};

/// Branch CRUD.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchService: Send + Sync {
    /// Every branch; an empty collection is not an error.
    async fn get_all(&self) -> Result<Vec<Branch>, Error>;

    /// One branch, or a not-found error.
    async fn get_by_id(&self, id: &str) -> Result<Branch, Error>;

    /// Create a branch and return it with its assigned id.
    async fn create(&self, branch: NewBranch) -> Result<Branch, Error>;

    /// Merge the supplied fields into an existing branch.
    async fn update(&self, id: &str, patch: BranchPatch) -> Result<Branch, Error>;

    /// Remove an existing branch. Its employees are left in place.
    async fn delete(&self, id: &str) -> Result<(), Error>;
}
