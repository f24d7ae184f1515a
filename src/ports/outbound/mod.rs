/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// The audit core reaches the vulnerability database, repository hosts,
/// the console and the output destination only through these traits.
pub mod advisory_transport;
pub mod output_presenter;
pub mod progress_reporter;
pub mod repository_source;

pub use advisory_transport::{AdvisoryTransport, OsvPackage, OsvQuery, TransportResponse};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use repository_source::{RepositoryMeta, RepositorySource};
