//! HR records backend: credential registration and login, employee intake with
//! resume uploads, status and attendance tracking, and leave-request handling.

pub mod config;
pub mod error;
pub mod hr;
pub mod telemetry;
