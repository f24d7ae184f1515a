//! Dependency intelligence core: manifests in, scored findings out.
//!
//! Pure domain code; network and filesystem access live behind the
//! outbound ports.

pub mod domain;
pub mod parsers;
pub mod policies;
pub mod services;
