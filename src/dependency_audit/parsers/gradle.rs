use super::registry::{ManifestError, ManifestParser};
use crate::dependency_audit::domain::{Dependency, Ecosystem, Scope};
use once_cell::sync::Lazy;
use regex::Regex;

/// `configuration 'group:artifact:version'`, also with double quotes and
/// the Kotlin DSL call form `configuration("group:artifact:version")`
static GRADLE_COORDINATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\b(implementation|api|compileOnly|runtimeOnly|testImplementation)(?:\s+|\s*\(\s*)['"]([^'":\s]+):([^'":\s]+):([^'"\s]+)['"]"#,
    )
    .expect("gradle coordinate pattern is valid")
});

/// `build.gradle` and `build.gradle.kts`
pub struct GradleParser;

impl GradleParser {
    fn scope_for(configuration: &str) -> Scope {
        match configuration {
            "testImplementation" => Scope::Test,
            _ => Scope::Runtime,
        }
    }
}

impl ManifestParser for GradleParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        Ok(GRADLE_COORDINATE
            .captures_iter(content)
            .filter_map(|caps| {
                let name = format!("{}:{}", &caps[2], &caps[3]);
                Dependency::new(
                    Ecosystem::Maven,
                    &name,
                    &caps[4],
                    Self::scope_for(&caps[1]),
                    path,
                )
            })
            .collect())
    }
}
