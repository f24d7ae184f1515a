use crate::dependency_audit::domain::{Severity, VulnerabilityRecord};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Body of a successful OSV `query` response
#[derive(Debug, Default, Deserialize)]
pub struct OsvQueryResponse {
    #[serde(default)]
    pub vulns: Vec<OsvAdvisory>,
}

/// One advisory as served by OSV. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct OsvAdvisory {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub severity: Vec<OsvSeverity>,
    #[serde(default)]
    pub affected: Vec<OsvAffected>,
    #[serde(default)]
    pub references: Vec<OsvReference>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsvSeverity {
    #[serde(rename = "type", default)]
    pub severity_type: String,
    /// Either a number or a string (often a CVSS vector)
    #[serde(default)]
    pub score: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsvAffected {
    #[serde(default)]
    pub ranges: Vec<OsvRange>,
    #[serde(default)]
    pub versions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsvRange {
    #[serde(default)]
    pub events: Vec<OsvEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsvEvent {
    #[serde(default)]
    pub introduced: Option<String>,
    #[serde(default)]
    pub fixed: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsvReference {
    #[serde(default)]
    pub url: Option<String>,
}

/// Converts one OSV advisory into a [`VulnerabilityRecord`].
///
/// Severity and score come from the last `severity` entry. The affected
/// range describes the first range of the first affected entry that has
/// any; fixed versions collect every `fixed` event and enumerated version.
pub fn normalize_advisory(advisory: &OsvAdvisory) -> VulnerabilityRecord {
    let id = advisory
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| advisory.aliases.first().cloned())
        .unwrap_or_default();

    let summary = advisory
        .summary
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| advisory.details.clone())
        .unwrap_or_default();

    let (severity, cvss_score) = match advisory.severity.last() {
        Some(entry) => (Severity::parse(&entry.severity_type), score_as_f64(&entry.score)),
        None => (Severity::Unknown, None),
    };

    let reference_url = advisory
        .references
        .first()
        .and_then(|r| r.url.clone())
        .unwrap_or_default();

    VulnerabilityRecord {
        id,
        summary,
        severity,
        cvss_score,
        affected_range: affected_range(&advisory.affected),
        fixed_versions: fixed_versions(&advisory.affected),
        reference_url,
    }
}

fn score_as_f64(score: &serde_json::Value) -> Option<f64> {
    match score {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn affected_range(affected: &[OsvAffected]) -> String {
    // the last entry that carries ranges wins
    let Some(range) = affected.iter().rev().find_map(|a| a.ranges.first()) else {
        return String::new();
    };

    let mut parts = Vec::new();
    for event in &range.events {
        if let Some(introduced) = &event.introduced {
            parts.push(format!(">={}", introduced));
        }
        if let Some(fixed) = &event.fixed {
            parts.push(format!("<{}", fixed));
        }
    }
    parts.join(" ")
}

fn fixed_versions(affected: &[OsvAffected]) -> Vec<String> {
    let mut versions = BTreeSet::new();
    for entry in affected {
        for range in &entry.ranges {
            versions.extend(range.events.iter().filter_map(|e| e.fixed.clone()));
        }
        versions.extend(entry.versions.iter().cloned());
    }
    versions.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisory(json: serde_json::Value) -> OsvAdvisory {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalize_full_advisory() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "id": "GHSA-xxxx",
            "summary": "Prototype pollution",
            "severity": [{"type": "HIGH", "score": "7.5"}],
            "affected": [{
                "ranges": [{"type": "SEMVER", "events": [
                    {"introduced": "1.0.0"}, {"fixed": "1.2.5"}
                ]}],
                "versions": ["1.0.0", "1.1.0"]
            }],
            "references": [{"url": "https://example.com/a"}, {"url": "https://example.com/b"}]
        })));

        assert_eq!(record.id, "GHSA-xxxx");
        assert_eq!(record.summary, "Prototype pollution");
        assert_eq!(record.severity, Severity::High);
        assert_eq!(record.cvss_score, Some(7.5));
        assert_eq!(record.affected_range, ">=1.0.0 <1.2.5");
        assert_eq!(record.fixed_versions, vec!["1.0.0", "1.1.0", "1.2.5"]);
        assert_eq!(record.reference_url, "https://example.com/a");
    }

    #[test]
    fn test_severity_last_entry_wins() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "id": "X",
            "severity": [{"type": "LOW", "score": 2.0}, {"type": "CRITICAL", "score": 9.8}]
        })));
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.cvss_score, Some(9.8));
    }

    #[test]
    fn test_vector_score_is_not_numeric() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "id": "X",
            "severity": [{"type": "CVSS_V3", "score": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"}]
        })));
        assert_eq!(record.severity, Severity::Unknown);
        assert_eq!(record.cvss_score, None);
    }

    #[test]
    fn test_minimal_advisory_defaults() {
        let record = normalize_advisory(&advisory(serde_json::json!({})));
        assert_eq!(record.id, "");
        assert_eq!(record.summary, "");
        assert_eq!(record.severity, Severity::Unknown);
        assert_eq!(record.cvss_score, None);
        assert_eq!(record.affected_range, "");
        assert!(record.fixed_versions.is_empty());
        assert_eq!(record.reference_url, "");
    }

    #[test]
    fn test_id_falls_back_to_first_alias() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "aliases": ["CVE-2024-0001", "CVE-2024-0002"]
        })));
        assert_eq!(record.id, "CVE-2024-0001");
    }

    #[test]
    fn test_summary_falls_back_to_details() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "id": "X", "summary": "", "details": "Long description"
        })));
        assert_eq!(record.summary, "Long description");
    }

    #[test]
    fn test_affected_range_skips_entries_without_ranges() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "id": "X",
            "affected": [
                {"ranges": [
                    {"events": [{"introduced": "0"}, {"fixed": "2.0.0"}]},
                    {"events": [{"introduced": "3.0.0"}, {"fixed": "3.1.0"}]}
                ]},
                {"versions": ["0.9"]}
            ]
        })));
        assert_eq!(record.affected_range, ">=0 <2.0.0");
        assert_eq!(record.fixed_versions, vec!["0.9", "2.0.0", "3.1.0"]);
    }

    #[test]
    fn test_affected_range_uses_last_entry_with_ranges() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "id": "X",
            "affected": [
                {"ranges": [{"events": [{"introduced": "0"}, {"fixed": "1.0.0"}]}]},
                {"ranges": [{"events": [{"introduced": "2.0.0"}, {"fixed": "2.1.0"}]}]}
            ]
        })));
        assert_eq!(record.affected_range, ">=2.0.0 <2.1.0");
        assert_eq!(record.fixed_versions, vec!["1.0.0", "2.1.0"]);
    }

    #[test]
    fn test_fixed_versions_are_deduplicated() {
        let record = normalize_advisory(&advisory(serde_json::json!({
            "id": "X",
            "affected": [
                {"ranges": [{"events": [{"fixed": "1.2.5"}]}]},
                {"ranges": [{"events": [{"fixed": "1.2.5"}]}], "versions": ["1.2.5"]}
            ]
        })));
        assert_eq!(record.fixed_versions, vec!["1.2.5"]);
    }

    #[test]
    fn test_query_response_without_vulns() {
        let response: OsvQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.vulns.is_empty());
    }
}
