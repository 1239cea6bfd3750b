//! Domain primitives, services and ports.
//!
//! Purpose: model branches and employees as documents in named collections,
//! validate inbound payloads against declarative rules, and expose the
//! use-cases the HTTP adapter drives. Nothing here depends on Actix or on a
//! particular database.
//!
//! Public surface:
//! - [`DocumentRepository`] and [`Transaction`]: collection-level access with
//!   error normalisation.
//! - [`Branch`], [`Employee`] and their payload types.
//! - [`Error`] and its constituents: the single error type bubbled to the
//!   outermost handler.

pub mod branch;
mod branch_service;
pub mod document;
pub mod employee;
mod employee_service;
pub mod entity;
pub mod error;
pub mod ports;
pub mod repository;
pub mod validation;

pub use self::branch::{BRANCHES, Branch, BranchPatch, NewBranch};
pub use self::branch_service::DocumentBranchService;
pub use self::document::{
    Document, DocumentId, DocumentIdValidationError, FieldFilter, FilterValue, StoredDocument,
    matches_all,
};
pub use self::employee::{BranchRef, EMPLOYEES, Employee, EmployeePatch, NewEmployee};
pub use self::employee_service::DocumentEmployeeService;
pub use self::entity::{CollectionService, Entity};
pub use self::error::{Error, RepositoryError, ServiceError, ValidationError};
pub use self::repository::{DocumentRepository, Transaction};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use workforce::domain::{ApiResult, RepositoryError};
///
/// fn lookup() -> ApiResult<()> {
///     Err(RepositoryError::not_found("branches", "b1").into())
/// }
/// assert_eq!(lookup().unwrap_err().http_status(), 404);
/// ```
pub type ApiResult<T> = Result<T, Error>;
