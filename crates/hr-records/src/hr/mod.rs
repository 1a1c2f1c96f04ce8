//! HR records domain: accounts, employee records, and leave requests.

pub mod auth;
pub mod domain;
pub mod employees;
pub mod error;
pub mod form;
pub mod leaves;
pub mod query;
pub mod repository;
pub mod store;
pub mod uploads;
pub mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;

pub use auth::{
    auth_router, Argon2Hasher, AuthService, Authenticator, CredentialHasher, JwtSigner, Principal,
    TokenSigner,
};
pub use domain::{
    AttendanceStatus, Credential, EmployeeRecord, EmployeeStatus, LeaveRecord, LeaveStatus,
    Position, RecordId,
};
pub use employees::{employee_router, EmployeeService};
pub use error::ServiceError;
pub use leaves::{leave_router, LeaveService};
pub use repository::{CredentialRepository, EmployeeRepository, LeaveRepository, RepositoryError};
pub use store::MemoryStore;
pub use uploads::{DiskDocumentStore, DocumentStore};
pub use validation::{FieldViolation, ValidationErrors, ViolationKind};

/// All HR routes, with the protected ones guarded by the auth service.
pub fn hr_router<C, E, L>(
    auth: Arc<AuthService<C>>,
    employees: Arc<EmployeeService<E>>,
    leaves: Arc<LeaveService<L, E>>,
) -> Router
where
    C: CredentialRepository + 'static,
    E: EmployeeRepository + 'static,
    L: LeaveRepository + 'static,
{
    let authenticator: Arc<dyn Authenticator> = auth.clone();
    Router::new()
        .merge(auth_router(auth))
        .merge(employee_router(employees, authenticator.clone()))
        .merge(leave_router(leaves, authenticator))
}
