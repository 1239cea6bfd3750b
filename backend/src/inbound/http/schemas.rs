//! OpenAPI schema definitions for response envelopes.
//!
//! Handlers serialise the generic [`super::envelope::Envelope`]; these
//! concrete wrappers exist only so the generated document names each
//! response shape.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Branch, Employee};

/// Envelope around one branch.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BranchEnvelope {
    #[schema(example = "Branch Retrieved")]
    message: String,
    data: Branch,
}

/// Envelope around every branch.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BranchListEnvelope {
    #[schema(example = "Branches Retrieved")]
    message: String,
    data: Vec<Branch>,
}

/// Envelope around one employee.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmployeeEnvelope {
    #[schema(example = "Employee Retrieved")]
    message: String,
    data: Employee,
}

/// Envelope around a list of employees.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmployeeListEnvelope {
    #[schema(example = "Employees Retrieved")]
    message: String,
    data: Vec<Employee>,
}

/// Envelope carrying only a message.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageEnvelope {
    #[schema(example = "Branch Deleted")]
    message: String,
}

/// Number of documents removed by a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeletedCount {
    #[schema(example = 3)]
    pub deleted: usize,
}

/// Envelope around a bulk delete count.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeletedCountEnvelope {
    #[schema(example = "Employees for Branch Deleted")]
    message: String,
    data: DeletedCount,
}
