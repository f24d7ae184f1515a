/// Application layer - Use cases and DTOs
///
/// Orchestrates the dependency audit core and reaches infrastructure only
/// through the outbound ports.
pub mod dto;
pub mod use_cases;
