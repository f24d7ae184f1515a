/// Data Transfer Objects for application layer
///
/// The response side is the domain `ScanReport` itself.
mod audit_request;

pub use audit_request::{AuditRequest, DEFAULT_DIRECTORIES};
