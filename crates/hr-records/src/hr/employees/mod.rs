//! Employee lifecycle: intake with resume upload, edits, status and attendance changes.

pub mod router;
pub mod service;

pub use router::employee_router;
pub use service::EmployeeService;
