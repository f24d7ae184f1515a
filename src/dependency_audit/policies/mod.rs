pub mod upgrade_advisor;
pub mod version_normalizer;

pub use upgrade_advisor::recommend_upgrades;
pub use version_normalizer::normalize_version;
