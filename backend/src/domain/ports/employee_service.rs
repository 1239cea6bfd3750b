//! Driving port for employee use-cases.

use async_trait::async_trait;

use crate::domain::{Employee, EmployeePatch, Error, NewEmployee};

/// Employee CRUD plus the branch and department views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// Every employee; an empty collection is not an error.
    async fn get_all(&self) -> Result<Vec<Employee>, Error>;

    /// One employee, or a not-found error.
    async fn get_by_id(&self, id: &str) -> Result<Employee, Error>;

    /// Create an employee and return it with its assigned id.
    async fn create(&self, employee: NewEmployee) -> Result<Employee, Error>;

    /// Merge the supplied fields into an existing employee.
    async fn update(&self, id: &str, patch: EmployeePatch) -> Result<Employee, Error>;

    /// Remove an existing employee.
    async fn delete(&self, id: &str) -> Result<(), Error>;

    /// Employees whose branch reference spells `branch_id`, whether stored
    /// as text or as a number.
    async fn by_branch(&self, branch_id: &str) -> Result<Vec<Employee>, Error>;

    /// Employees of a department, compared case-insensitively.
    async fn by_department(&self, department: &str) -> Result<Vec<Employee>, Error>;

    /// Remove every employee of a branch in one transaction and return how
    /// many were removed.
    async fn delete_by_branch(&self, branch_id: &str) -> Result<usize, Error>;
}
