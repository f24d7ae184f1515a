//! Manifest parsing strategies, one per file format

pub mod cargo;
pub mod go;
pub mod gradle;
pub mod maven;
pub mod npm;
pub mod python;
pub mod registry;

pub use registry::{ManifestError, ManifestParser, ManifestParserRegistry, ParseOutcome};
