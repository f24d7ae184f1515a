use crate::shared::Result;

/// OutputPresenter port for delivering the rendered scan report
///
/// The destination (stdout, a file) is chosen by the implementation.
pub trait OutputPresenter {
    /// # Errors
    /// Returns an error if the destination cannot be written.
    fn present(&self, content: &str) -> Result<()>;
}
