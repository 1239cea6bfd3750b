//! Employee service backed by the document repository.
//!
//! The branch and department views fetch the whole collection and filter in
//! process; only the transactional branch purge pushes filters to the store.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::EmployeeService;
use crate::domain::{
    BranchRef, CollectionService, DocumentRepository, EMPLOYEES, Employee, EmployeePatch, Error,
    NewEmployee,
};

/// [`EmployeeService`] implementation over the `employees` collection.
#[derive(Clone)]
pub struct DocumentEmployeeService {
    employees: CollectionService<Employee>,
}

impl DocumentEmployeeService {
    /// Create a service reading and writing through `repository`.
    pub fn new(repository: DocumentRepository) -> Self {
        Self {
            employees: CollectionService::new(repository),
        }
    }
}

#[async_trait]
impl EmployeeService for DocumentEmployeeService {
    async fn get_all(&self) -> Result<Vec<Employee>, Error> {
        self.employees.get_all().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Employee, Error> {
        self.employees.get_by_id(id).await
    }

    async fn create(&self, employee: NewEmployee) -> Result<Employee, Error> {
        self.employees.create(employee).await
    }

    async fn update(&self, id: &str, patch: EmployeePatch) -> Result<Employee, Error> {
        self.employees.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.employees.delete(id).await
    }

    async fn by_branch(&self, branch_id: &str) -> Result<Vec<Employee>, Error> {
        let mut employees = self.employees.get_all().await?;
        employees.retain(|employee| employee.branch_id.matches(branch_id));
        Ok(employees)
    }

    async fn by_department(&self, department: &str) -> Result<Vec<Employee>, Error> {
        let mut employees = self.employees.get_all().await?;
        employees.retain(|employee| employee.in_department(department));
        Ok(employees)
    }

    async fn delete_by_branch(&self, branch_id: &str) -> Result<usize, Error> {
        let repository = self.employees.repository();
        let filter_sets = BranchRef::filters_for(branch_id);
        let filter_sets = filter_sets.as_slice();
        let deleted = repository
            .run_transaction(|tx| async move {
                let mut deleted = 0;
                for filters in filter_sets {
                    deleted += repository
                        .delete_by_filter(EMPLOYEES, filters, Some(&tx))
                        .await?;
                }
                Ok(deleted)
            })
            .await?;
        info!(branch_id, deleted, "removed employees of branch");
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "employee_service_tests.rs"]
mod tests;
