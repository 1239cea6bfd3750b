//! Employee HTTP handlers.
//!
//! ```text
//! GET    /api/v1/employees
//! GET    /api/v1/employees/{id}
//! POST   /api/v1/employees
//! PUT    /api/v1/employees/{id}
//! DELETE /api/v1/employees/{id}
//! GET    /api/v1/employees/branch/{branchId}
//! DELETE /api/v1/employees/branch/{branchId}
//! GET    /api/v1/employees/department/{department}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{EmployeePatch, NewEmployee};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, created, ok};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    DeletedCount, DeletedCountEnvelope, EmployeeEnvelope, EmployeeListEnvelope, MessageEnvelope,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Validated, ValidationRejectionBody};

/// Register the employee routes on a scope.
///
/// The `branch` and `department` sub-resources are two segments deep, so
/// they never collide with `/employees/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_employees)
        .service(employees_by_branch)
        .service(delete_employees_by_branch)
        .service(employees_by_department)
        .service(get_employee)
        .service(create_employee)
        .service(update_employee)
        .service(delete_employee);
}

/// List every employee.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employees", body = EmployeeListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/employees")]
pub async fn list_employees(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let employees = state.employees.get_all().await?;
    Ok(ok("Employees Retrieved", employees))
}

/// Fetch one employee.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee", body = EmployeeEnvelope),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
#[get("/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let employee = state.employees.get_by_id(&path.into_inner()).await?;
    Ok(ok("Employee Retrieved", employee))
}

/// Create an employee. The branch reference is not checked.
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = EmployeeEnvelope),
        (status = 400, description = "Invalid request", body = ValidationRejectionBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    payload: Validated<NewEmployee>,
) -> ApiResult<HttpResponse> {
    let employee = state.employees.create(payload.into_inner()).await?;
    Ok(created("Employee Created", employee))
}

/// Merge the supplied fields into an employee.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeEnvelope),
        (status = 400, description = "Invalid request", body = ValidationRejectionBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
#[put("/employees/{id}")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Validated<EmployeePatch>,
) -> ApiResult<HttpResponse> {
    let employee = state
        .employees
        .update(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(ok("Employee Updated", employee))
}

/// Remove an employee.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee deleted", body = MessageEnvelope),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.employees.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::message_only("Employee Deleted")))
}

/// Employees referencing a branch. An unknown branch yields an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/employees/branch/{branchId}",
    params(("branchId" = String, Path, description = "Branch identifier")),
    responses(
        (status = 200, description = "Employees of the branch", body = EmployeeListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "listEmployeesByBranch"
)]
#[get("/employees/branch/{branchId}")]
pub async fn employees_by_branch(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let employees = state.employees.by_branch(&path.into_inner()).await?;
    Ok(ok("Employees for Branch Retrieved", employees))
}

/// Remove every employee of a branch in one transaction.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/branch/{branchId}",
    params(("branchId" = String, Path, description = "Branch identifier")),
    responses(
        (status = 200, description = "Employees removed", body = DeletedCountEnvelope),
        (status = 409, description = "Concurrent modification", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployeesByBranch"
)]
#[delete("/employees/branch/{branchId}")]
pub async fn delete_employees_by_branch(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let deleted = state.employees.delete_by_branch(&path.into_inner()).await?;
    Ok(ok("Employees for Branch Deleted", DeletedCount { deleted }))
}

/// Employees of a department, compared case-insensitively.
#[utoipa::path(
    get,
    path = "/api/v1/employees/department/{department}",
    params(("department" = String, Path, description = "Department name")),
    responses(
        (status = 200, description = "Employees of the department", body = EmployeeListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["employees"],
    operation_id = "listEmployeesByDepartment"
)]
#[get("/employees/department/{department}")]
pub async fn employees_by_department(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let employees = state.employees.by_department(&path.into_inner()).await?;
    Ok(ok("Employees by Department Retrieved", employees))
}

#[cfg(test)]
#[path = "employees_tests.rs"]
mod tests;
