//! Branch HTTP handlers.
//!
//! ```text
//! GET    /api/v1/branches
//! GET    /api/v1/branches/{id}
//! POST   /api/v1/branches
//! PUT    /api/v1/branches/{id}
//! DELETE /api/v1/branches/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{BranchPatch, NewBranch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, created, ok};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{BranchEnvelope, BranchListEnvelope, MessageEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Validated, ValidationRejectionBody};

/// Register the branch routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_branches)
        .service(get_branch)
        .service(create_branch)
        .service(update_branch)
        .service(delete_branch);
}

/// List every branch.
#[utoipa::path(
    get,
    path = "/api/v1/branches",
    responses(
        (status = 200, description = "Branches", body = BranchListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["branches"],
    operation_id = "listBranches"
)]
#[get("/branches")]
pub async fn list_branches(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let branches = state.branches.get_all().await?;
    Ok(ok("Branches Retrieved", branches))
}

/// Fetch one branch.
#[utoipa::path(
    get,
    path = "/api/v1/branches/{id}",
    params(("id" = String, Path, description = "Branch identifier")),
    responses(
        (status = 200, description = "Branch", body = BranchEnvelope),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["branches"],
    operation_id = "getBranch"
)]
#[get("/branches/{id}")]
pub async fn get_branch(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let branch = state.branches.get_by_id(&path.into_inner()).await?;
    Ok(ok("Branch Retrieved", branch))
}

/// Create a branch.
#[utoipa::path(
    post,
    path = "/api/v1/branches",
    request_body = NewBranch,
    responses(
        (status = 201, description = "Branch created", body = BranchEnvelope),
        (status = 400, description = "Invalid request", body = ValidationRejectionBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["branches"],
    operation_id = "createBranch"
)]
#[post("/branches")]
pub async fn create_branch(
    state: web::Data<HttpState>,
    payload: Validated<NewBranch>,
) -> ApiResult<HttpResponse> {
    let branch = state.branches.create(payload.into_inner()).await?;
    Ok(created("Branch Created", branch))
}

/// Merge the supplied fields into a branch.
#[utoipa::path(
    put,
    path = "/api/v1/branches/{id}",
    params(("id" = String, Path, description = "Branch identifier")),
    request_body = BranchPatch,
    responses(
        (status = 200, description = "Branch updated", body = BranchEnvelope),
        (status = 400, description = "Invalid request", body = ValidationRejectionBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["branches"],
    operation_id = "updateBranch"
)]
#[put("/branches/{id}")]
pub async fn update_branch(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Validated<BranchPatch>,
) -> ApiResult<HttpResponse> {
    let branch = state
        .branches
        .update(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(ok("Branch Updated", branch))
}

/// Remove a branch. Its employees are left in place.
#[utoipa::path(
    delete,
    path = "/api/v1/branches/{id}",
    params(("id" = String, Path, description = "Branch identifier")),
    responses(
        (status = 200, description = "Branch deleted", body = MessageEnvelope),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["branches"],
    operation_id = "deleteBranch"
)]
#[delete("/branches/{id}")]
pub async fn delete_branch(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.branches.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::message_only("Branch Deleted")))
}

#[cfg(test)]
#[path = "branches_tests.rs"]
mod tests;
