/// Characters stripped from the front of a version constraint
const LEADING_OPERATORS: &[char] = &['~', '^', '>', '<', '='];

/// Strips leading comparator operators and whitespace from a version string.
///
/// `">=1.2.3"` becomes `"1.2.3"` and `"^2.0.0"` becomes `"2.0.0"`. When
/// nothing would remain (an empty string, or a bare operator such as `">="`)
/// the input is returned unchanged.
pub fn normalize_version(version: &str) -> String {
    let stripped = version
        .trim()
        .trim_start_matches(|c: char| c.is_whitespace() || LEADING_OPERATORS.contains(&c));

    if stripped.is_empty() {
        version.to_string()
    } else {
        stripped.to_string()
    }
}
