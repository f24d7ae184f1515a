pub mod advisory_normalizer;
pub mod risk_aggregator;

pub use advisory_normalizer::{normalize_advisory, OsvAdvisory, OsvQueryResponse};
pub use risk_aggregator::RiskAggregator;
