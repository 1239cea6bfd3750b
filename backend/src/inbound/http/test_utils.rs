//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{MockBranchService, MockEmployeeService};
use crate::domain::{Branch, BranchRef, DocumentId, Employee};
use crate::inbound::http::state::HttpState;

/// App serving the `/api/v1` resource routes over the supplied mocks.
///
/// A mock left without expectations panics when called, so tests only set up
/// the port they exercise.
pub fn api_app(
    branches: MockBranchService,
    employees: MockEmployeeService,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(branches), Arc::new(employees));
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(super::configure_api))
}

pub fn branch(id: &str) -> Branch {
    Branch {
        id: DocumentId::new(id).expect("valid id"),
        name: "Main".to_owned(),
        address: "1 High Street".to_owned(),
        phone: "555-0100".to_owned(),
    }
}

pub fn employee(id: &str, branch_id: &str, department: &str) -> Employee {
    Employee {
        id: DocumentId::new(id).expect("valid id"),
        name: "Ada Lovelace".to_owned(),
        position: "Analyst".to_owned(),
        department: department.to_owned(),
        email: "ada@example.com".to_owned(),
        phone: "555-0101".to_owned(),
        branch_id: BranchRef::Text(branch_id.to_owned()),
    }
}
