/// Crate-wide result type.
///
/// Fatal conditions are `AuditError` values wrapped in `anyhow::Error`, so
/// callers can add context with `?` and still downcast at the top level.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
