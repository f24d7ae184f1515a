use super::registry::{ManifestError, ManifestParser};
use crate::dependency_audit::domain::{Dependency, Ecosystem, Scope, ANY_VERSION};
use serde::Deserialize;

/// Comparators a requirement string is split on, first occurrence wins
const REQUIREMENT_OPERATORS: &[&str] = &["==", ">=", "<=", "~=", "!="];

/// Splits `name<op>version` at the leftmost comparator.
///
/// Environment markers after `;` are dropped. Without a comparator the whole
/// entry is the name and the version is `*`.
fn split_requirement(entry: &str) -> (&str, &str) {
    let entry = entry.split(';').next().unwrap_or_default().trim();

    let leftmost = REQUIREMENT_OPERATORS
        .iter()
        .filter_map(|op| entry.find(op).map(|idx| (idx, op.len())))
        .min_by_key(|(idx, _)| *idx);

    match leftmost {
        Some((idx, len)) => (&entry[..idx], &entry[idx + len..]),
        None => (entry, ANY_VERSION),
    }
}

/// Version from a `name = "1.0"` or `name = { version = "1.0", ... }` entry
fn toml_entry_version(value: &toml::Value) -> &str {
    match value {
        toml::Value::String(s) => s.as_str(),
        toml::Value::Table(t) => t.get("version").and_then(|v| v.as_str()).unwrap_or(ANY_VERSION),
        _ => ANY_VERSION,
    }
}

/// `requirements.txt` and `requirements*.txt`
pub struct RequirementsParser;

impl ManifestParser for RequirementsParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let mut deps = Vec::new();

        for line in content.lines() {
            let line = match line.find(" #") {
                Some(idx) => &line[..idx],
                None => line,
            };
            let line = line.trim();
            // pip options such as -r, -e, --index-url
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }

            let (name, version) = split_requirement(line);
            deps.extend(Dependency::new(Ecosystem::Pypi, name, version, Scope::Runtime, path));
        }

        Ok(deps)
    }
}

/// `pyproject.toml`: PEP 621 tables and Poetry tables
pub struct PyprojectParser;

impl PyprojectParser {
    fn poetry_section(
        table: Option<&toml::Value>,
        scope: Scope,
        path: &str,
        deps: &mut Vec<Dependency>,
    ) {
        let Some(entries) = table.and_then(|t| t.as_table()) else {
            return;
        };
        for (name, value) in entries {
            if name == "python" {
                continue;
            }
            deps.extend(Dependency::new(
                Ecosystem::Pypi,
                name,
                toml_entry_version(value),
                scope,
                path,
            ));
        }
    }
}

impl ManifestParser for PyprojectParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let data: toml::Table = toml::from_str(content)?;
        let mut deps = Vec::new();

        if let Some(project) = data.get("project") {
            let primary = project.get("dependencies").and_then(|d| d.as_array());
            for entry in primary.into_iter().flatten().filter_map(|e| e.as_str()) {
                let (name, version) = split_requirement(entry);
                deps.extend(Dependency::new(Ecosystem::Pypi, name, version, Scope::Runtime, path));
            }

            let optional = project
                .get("optional-dependencies")
                .and_then(|o| o.as_table());
            for group in optional.into_iter().flat_map(|o| o.values()) {
                let entries = group.as_array().into_iter().flatten();
                for entry in entries.filter_map(|e| e.as_str()) {
                    let (name, version) = split_requirement(entry);
                    deps.extend(Dependency::new(Ecosystem::Pypi, name, version, Scope::Dev, path));
                }
            }
        }

        let poetry = data.get("tool").and_then(|t| t.get("poetry"));
        if let Some(poetry) = poetry {
            Self::poetry_section(poetry.get("dependencies"), Scope::Runtime, path, &mut deps);
            Self::poetry_section(poetry.get("dev-dependencies"), Scope::Dev, path, &mut deps);

            let groups = poetry.get("group").and_then(|g| g.as_table());
            for group in groups.into_iter().flat_map(|g| g.values()) {
                Self::poetry_section(group.get("dependencies"), Scope::Dev, path, &mut deps);
            }
        }

        Ok(deps)
    }
}

/// `Pipfile` (TOML)
pub struct PipfileParser;

impl ManifestParser for PipfileParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let data: toml::Table = toml::from_str(content)?;
        let mut deps = Vec::new();

        for (section, scope) in [("packages", Scope::Runtime), ("dev-packages", Scope::Dev)] {
            let Some(entries) = data.get(section).and_then(|s| s.as_table()) else {
                continue;
            };
            for (name, value) in entries {
                deps.extend(Dependency::new(
                    Ecosystem::Pypi,
                    name,
                    toml_entry_version(value),
                    scope,
                    path,
                ));
            }
        }

        Ok(deps)
    }
}

/// `Pipfile.lock` (JSON)
pub struct PipfileLockParser;

impl ManifestParser for PipfileLockParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let data: serde_json::Value = serde_json::from_str(content)?;
        let mut deps = Vec::new();

        for (section, scope) in [("default", Scope::Runtime), ("develop", Scope::Dev)] {
            let Some(entries) = data.get(section).and_then(|s| s.as_object()) else {
                continue;
            };
            for (name, entry) in entries {
                let version = entry
                    .get("version")
                    .and_then(|v| v.as_str())
                    .unwrap_or(ANY_VERSION);
                deps.extend(Dependency::new(Ecosystem::Pypi, name, version, scope, path));
            }
        }

        Ok(deps)
    }
}

#[derive(Debug, Deserialize)]
struct PythonLock {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    source: Option<LockedSource>,
}

#[derive(Debug, Deserialize)]
struct LockedSource {
    #[serde(default)]
    editable: Option<String>,
    #[serde(default, rename = "virtual")]
    virtual_path: Option<String>,
}

impl LockedPackage {
    /// uv records the project itself as an editable or virtual package
    fn is_local_project(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| s.editable.is_some() || s.virtual_path.is_some())
    }
}

/// `poetry.lock` and `uv.lock`: one runtime dependency per `[[package]]`
pub struct PythonLockParser;

impl ManifestParser for PythonLockParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let lock: PythonLock = toml::from_str(content)?;

        Ok(lock
            .package
            .iter()
            .filter(|pkg| !pkg.is_local_project())
            .filter_map(|pkg| {
                let name = pkg.name.as_deref()?;
                let version = pkg.version.as_deref().unwrap_or(ANY_VERSION);
                Dependency::new(Ecosystem::Pypi, name, version, Scope::Runtime, path)
            })
            .collect())
    }
}
