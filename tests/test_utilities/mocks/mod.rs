/// Mock implementations for testing
mod mock_advisory_transport;
mod mock_progress_reporter;
mod mock_repository_source;

pub use mock_advisory_transport::MockAdvisoryTransport;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_repository_source::MockRepositorySource;
