use crate::dependency_audit::policies::normalize_version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version sentinel meaning "unconstrained or unknown"
pub const ANY_VERSION: &str = "*";

/// Package-manager namespace a dependency belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    Pypi,
    Maven,
    Go,
    Cargo,
}

impl Ecosystem {
    /// Lowercase identifier used in keys and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Pypi => "pypi",
            Ecosystem::Maven => "maven",
            Ecosystem::Go => "go",
            Ecosystem::Cargo => "cargo",
        }
    }

    /// Ecosystem name as the OSV database spells it
    pub fn osv_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Pypi => "PyPI",
            Ecosystem::Maven => "Maven",
            Ecosystem::Go => "Go",
            Ecosystem::Cargo => "crates.io",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(Ecosystem::Npm),
            "pypi" => Ok(Ecosystem::Pypi),
            "maven" => Ok(Ecosystem::Maven),
            "go" | "golang" => Ok(Ecosystem::Go),
            "cargo" | "crates.io" => Ok(Ecosystem::Cargo),
            _ => Err(format!("Unknown ecosystem: {}", s)),
        }
    }
}

/// Usage context of a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Runtime,
    Dev,
    Test,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Runtime => "runtime",
            Scope::Dev => "dev",
            Scope::Test => "test",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation identity of a dependency: `(ecosystem, lowercase name, version)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyKey {
    pub ecosystem: String,
    pub name: String,
    pub version: String,
}

impl DependencyKey {
    pub fn new(ecosystem: &str, name: &str, version: &str) -> Self {
        Self {
            ecosystem: ecosystem.to_lowercase(),
            name: name.to_lowercase(),
            version: version.to_string(),
        }
    }
}

/// A dependency declared directly by a manifest
///
/// Built only through [`Dependency::new`], which trims the name and
/// normalizes the version; the fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    ecosystem: Ecosystem,
    name: String,
    version: String,
    scope: Scope,
    manifest_path: String,
}

impl Dependency {
    /// Creates a normalized dependency record.
    ///
    /// Returns `None` when the name is empty after trimming.
    pub fn new(
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
        scope: Scope,
        manifest_path: &str,
    ) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            ecosystem,
            name: name.to_string(),
            version: normalize_version(version),
            scope,
            manifest_path: manifest_path.to_string(),
        })
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn manifest_path(&self) -> &str {
        &self.manifest_path
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(self.ecosystem.as_str(), &self.name, &self.version)
    }

    /// `ecosystem|name|version`, the key used by batch lookups
    pub fn composite_key(&self) -> String {
        format!("{}|{}|{}", self.ecosystem, self.name, self.version)
    }
}
