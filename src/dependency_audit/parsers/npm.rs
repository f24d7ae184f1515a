use super::registry::{ManifestError, ManifestParser};
use crate::dependency_audit::domain::{Dependency, Ecosystem, Scope, ANY_VERSION};
use serde_json::Value;

const PACKAGE_JSON_SECTIONS: &[(&str, Scope)] = &[
    ("dependencies", Scope::Runtime),
    ("devDependencies", Scope::Dev),
    ("optionalDependencies", Scope::Runtime),
];

/// `package.json`: declared dependency maps
pub struct PackageJsonParser;

impl ManifestParser for PackageJsonParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let data: Value = serde_json::from_str(content)?;
        let mut deps = Vec::new();

        for (section, scope) in PACKAGE_JSON_SECTIONS {
            let Some(entries) = data.get(*section).and_then(Value::as_object) else {
                continue;
            };
            for (name, version) in entries {
                let version = version.as_str().unwrap_or(ANY_VERSION);
                deps.extend(Dependency::new(Ecosystem::Npm, name, version, *scope, path));
            }
        }

        Ok(deps)
    }
}

/// `package-lock.json`: pinned versions from lockfile v1, v2 or v3
pub struct PackageLockParser;

impl PackageLockParser {
    const NODE_MODULES: &'static str = "node_modules/";

    fn scope_of(entry: &Value) -> Scope {
        if entry.get("dev").and_then(Value::as_bool).unwrap_or(false) {
            Scope::Dev
        } else {
            Scope::Runtime
        }
    }

    fn version_of(entry: &Value) -> &str {
        entry
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or(ANY_VERSION)
    }
}

impl ManifestParser for PackageLockParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let data: Value = serde_json::from_str(content)?;
        let mut deps = Vec::new();

        if let Some(packages) = data.get("packages").and_then(Value::as_object) {
            for (key, entry) in packages {
                // "" is the root project; nested installs keep only the last segment
                let Some(idx) = key.rfind(Self::NODE_MODULES) else {
                    continue;
                };
                let name = &key[idx + Self::NODE_MODULES.len()..];
                deps.extend(Dependency::new(
                    Ecosystem::Npm,
                    name,
                    Self::version_of(entry),
                    Self::scope_of(entry),
                    path,
                ));
            }
            return Ok(deps);
        }

        if let Some(dependencies) = data.get("dependencies").and_then(Value::as_object) {
            for (name, entry) in dependencies {
                deps.extend(Dependency::new(
                    Ecosystem::Npm,
                    name,
                    Self::version_of(entry),
                    Self::scope_of(entry),
                    path,
                ));
            }
        }

        Ok(deps)
    }
}
