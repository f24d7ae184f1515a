/// Filesystem adapters: local repositories in, reports out
mod file_writer;
mod local_source;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use local_source::LocalRepositorySource;
