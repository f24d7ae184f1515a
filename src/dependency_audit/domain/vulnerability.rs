use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory severity label
///
/// Parsing never fails: anything unrecognized becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Parses a severity label case-insensitively (`MODERATE` is `MEDIUM`)
    pub fn parse(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" | "MODERATE" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    /// Strict variant of `parse` for user input: unrecognized labels are `None`
    pub fn from_label(label: &str) -> Option<Self> {
        match Self::parse(label) {
            Severity::Unknown if !label.trim().eq_ignore_ascii_case("UNKNOWN") => None,
            severity => Some(severity),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Risk weight: CRITICAL=5, HIGH=4, MEDIUM=3, LOW=1, UNKNOWN=1
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Critical => 5,
            Severity::High => 4,
            Severity::Medium => 3,
            Severity::Low | Severity::Unknown => 1,
        }
    }

    /// Total order used to pick a repository's highest severity.
    ///
    /// Follows `weight`, with LOW placed above UNKNOWN so equal weights
    /// still resolve the same way regardless of input order.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 5,
            Severity::High => 4,
            Severity::Medium => 3,
            Severity::Low => 2,
            Severity::Unknown => 1,
        }
    }

    pub fn all() -> [Severity; 5] {
        [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Unknown,
        ]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized advisory affecting one dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    pub id: String,
    pub summary: String,
    pub severity: Severity,
    pub cvss_score: Option<f64>,
    /// Display string such as `>=1.0.0 <1.2.5`
    pub affected_range: String,
    /// Sorted and deduplicated
    pub fixed_versions: Vec<String>,
    pub reference_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_severity_labels() {
        assert_eq!(Severity::parse("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::parse("high"), Severity::High);
        assert_eq!(Severity::parse("Moderate"), Severity::Medium);
        assert_eq!(Severity::parse("medium"), Severity::Medium);
        assert_eq!(Severity::parse("LOW"), Severity::Low);
        assert_eq!(Severity::parse("CVSS_V3"), Severity::Unknown);
        assert_eq!(Severity::parse(""), Severity::Unknown);
    }

    #[test]
    fn test_from_label_rejects_unrecognized() {
        assert_eq!(Severity::from_label("high"), Some(Severity::High));
        assert_eq!(Severity::from_label("unknown"), Some(Severity::Unknown));
        assert_eq!(Severity::from_label("severe"), None);
        assert_eq!(Severity::from_label(""), None);
    }

    #[test]
    fn test_weights() {
        assert_eq!(Severity::Critical.weight(), 5);
        assert_eq!(Severity::High.weight(), 4);
        assert_eq!(Severity::Medium.weight(), 3);
        assert_eq!(Severity::Low.weight(), 1);
        assert_eq!(Severity::Unknown.weight(), 1);
    }

    #[test]
    fn test_rank_is_consistent_with_weight() {
        for a in Severity::all() {
            for b in Severity::all() {
                if a.weight() > b.weight() {
                    assert!(a.rank() > b.rank(), "{} should outrank {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_severity_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }
}
