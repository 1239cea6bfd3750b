//! Branch service backed by the document repository.

use async_trait::async_trait;

use crate::domain::ports::BranchService;
use crate::domain::{Branch, BranchPatch, CollectionService, DocumentRepository, Error, NewBranch};

/// [`BranchService`] implementation over the `branches` collection.
#[derive(Clone)]
pub struct DocumentBranchService {
    branches: CollectionService<Branch>,
}

impl DocumentBranchService {
    /// Create a service reading and writing through `repository`.
    pub fn new(repository: DocumentRepository) -> Self {
        Self {
            branches: CollectionService::new(repository),
        }
    }
}

#[async_trait]
impl BranchService for DocumentBranchService {
    async fn get_all(&self) -> Result<Vec<Branch>, Error> {
        self.branches.get_all().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Branch, Error> {
        self.branches.get_by_id(id).await
    }

    async fn create(&self, branch: NewBranch) -> Result<Branch, Error> {
        self.branches.create(branch).await
    }

    async fn update(&self, id: &str, patch: BranchPatch) -> Result<Branch, Error> {
        self.branches.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.branches.delete(id).await
    }
}

#[cfg(test)]
#[path = "branch_service_tests.rs"]
mod tests;
