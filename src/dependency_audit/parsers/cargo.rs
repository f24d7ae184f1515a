use super::registry::{ManifestError, ManifestParser};
use crate::dependency_audit::domain::{Dependency, Ecosystem, Scope, ANY_VERSION};
use serde::Deserialize;

const CARGO_SECTIONS: &[(&str, Scope)] = &[
    ("dependencies", Scope::Runtime),
    ("dev-dependencies", Scope::Dev),
    ("build-dependencies", Scope::Runtime),
];

/// `Cargo.toml`: dependency tables of the manifest
pub struct CargoTomlParser;

impl ManifestParser for CargoTomlParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let manifest: toml::Table = toml::from_str(content)?;
        let mut deps = Vec::new();

        for (section, scope) in CARGO_SECTIONS {
            let Some(entries) = manifest.get(*section).and_then(|s| s.as_table()) else {
                continue;
            };
            for (name, spec) in entries {
                let version = match spec {
                    toml::Value::String(v) => v.as_str(),
                    toml::Value::Table(t) => {
                        t.get("version").and_then(|v| v.as_str()).unwrap_or(ANY_VERSION)
                    }
                    _ => ANY_VERSION,
                };
                deps.extend(Dependency::new(Ecosystem::Cargo, name, version, *scope, path));
            }
        }

        Ok(deps)
    }
}

#[derive(Debug, Deserialize)]
struct CargoLock {
    #[serde(default)]
    package: Vec<CargoLockPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoLockPackage {
    name: String,
    version: String,
    /// Absent for workspace members
    #[serde(default)]
    source: Option<String>,
}

/// `Cargo.lock`: pinned registry and git packages
pub struct CargoLockParser;

impl ManifestParser for CargoLockParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let lock: CargoLock = toml::from_str(content)?;

        Ok(lock
            .package
            .iter()
            .filter(|pkg| pkg.source.is_some())
            .filter_map(|pkg| {
                Dependency::new(Ecosystem::Cargo, &pkg.name, &pkg.version, Scope::Runtime, path)
            })
            .collect())
    }
}
