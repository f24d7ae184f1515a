/// ProgressReporter port for user feedback during a scan
///
/// Messages are informational only; implementations must not fail.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str);

    /// Reports `current` out of `total` units of work
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    fn report_error(&self, message: &str);

    fn report_completion(&self, message: &str);
}
