use crate::dependency_audit::domain::VulnerabilityRecord;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Number of upgrade candidates suggested per dependency
const MAX_RECOMMENDATIONS: usize = 2;

/// Picks upgrade targets for a dependency from its advisories' fixed versions.
///
/// Candidates are taken in advisory order and must be non-empty, unseen and
/// newer than `current`. Versions that cannot be compared are kept.
pub fn recommend_upgrades(current: &str, vulnerabilities: &[VulnerabilityRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut picks = Vec::new();

    for candidate in vulnerabilities.iter().flat_map(|v| v.fixed_versions.iter()) {
        if picks.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        if candidate.is_empty() || seen.contains(candidate.as_str()) {
            continue;
        }
        if !is_newer_version(current, candidate) {
            continue;
        }
        seen.insert(candidate.as_str());
        picks.push(candidate.clone());
    }

    picks
}

/// Numeric components of the release part of a version (`1.2.3-rc1` → `[1, 2, 3]`).
///
/// Each dot-separated chunk contributes its leading digits; a chunk without
/// leading digits makes the version incomparable.
fn version_parts(version: &str) -> Option<Vec<u64>> {
    let release = version.split('-').next().unwrap_or_default();
    let mut parts = Vec::new();

    for chunk in release.split('.') {
        let digits: String = chunk.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        parts.push(digits.parse().ok()?);
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

fn is_newer_version(current: &str, candidate: &str) -> bool {
    let (Some(mut cur), Some(mut cand)) = (version_parts(current), version_parts(candidate)) else {
        return true;
    };

    let width = cur.len().max(cand.len());
    cur.resize(width, 0);
    cand.resize(width, 0);
    cand.cmp(&cur) == Ordering::Greater
}
