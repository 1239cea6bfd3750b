//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the entity, payload and envelope schemas they exchange. The document
//! backs Swagger UI in debug builds and is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{Branch, BranchPatch, Employee, EmployeePatch, NewBranch, NewEmployee};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::health::HealthReport;
use crate::inbound::http::schemas::{
    BranchEnvelope, BranchListEnvelope, DeletedCount, DeletedCountEnvelope, EmployeeEnvelope,
    EmployeeListEnvelope, MessageEnvelope,
};
use crate::inbound::http::validation::ValidationRejectionBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce API",
        version = "1.0.0",
        description = "Branches and the employees attached to them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::branches::list_branches,
        crate::inbound::http::branches::get_branch,
        crate::inbound::http::branches::create_branch,
        crate::inbound::http::branches::update_branch,
        crate::inbound::http::branches::delete_branch,
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::get_employee,
        crate::inbound::http::employees::create_employee,
        crate::inbound::http::employees::update_employee,
        crate::inbound::http::employees::delete_employee,
        crate::inbound::http::employees::employees_by_branch,
        crate::inbound::http::employees::delete_employees_by_branch,
        crate::inbound::http::employees::employees_by_department,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Branch,
        NewBranch,
        BranchPatch,
        Employee,
        NewEmployee,
        EmployeePatch,
        BranchEnvelope,
        BranchListEnvelope,
        EmployeeEnvelope,
        EmployeeListEnvelope,
        MessageEnvelope,
        DeletedCount,
        DeletedCountEnvelope,
        ErrorBody,
        ValidationRejectionBody,
        HealthReport,
    )),
    tags(
        (name = "branches", description = "Branch records"),
        (name = "employees", description = "Employee records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
