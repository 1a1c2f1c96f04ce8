//! Leave requests and their approval flow.

pub mod router;
pub mod service;

pub use router::leave_router;
pub use service::LeaveService;
