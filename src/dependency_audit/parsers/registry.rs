use super::cargo::{CargoLockParser, CargoTomlParser};
use super::go::GoModParser;
use super::gradle::GradleParser;
use super::maven::PomParser;
use super::npm::{PackageJsonParser, PackageLockParser};
use super::python::{
    PipfileLockParser, PipfileParser, PyprojectParser, PythonLockParser, RequirementsParser,
};
use crate::dependency_audit::domain::Dependency;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised by a single manifest parser
///
/// These never leave the registry: [`ManifestParserRegistry::parse`] turns
/// them into an empty result.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid XML: {0}")]
    Xml(String),

    #[error("unexpected structure: {0}")]
    Structure(String),
}

/// Strategy that turns the raw text of one manifest format into dependencies
pub trait ManifestParser: Send + Sync {
    /// Parses `content`; `path` is recorded as each dependency's manifest path
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError>;
}

/// Result of dispatching one manifest
#[derive(Debug)]
pub enum ParseOutcome {
    Parsed(Vec<Dependency>),
    /// No parser is registered for the file name
    Unsupported,
    /// The parser failed; the error was logged and swallowed
    Suppressed(ManifestError),
}

impl ParseOutcome {
    pub fn into_dependencies(self) -> Vec<Dependency> {
        match self {
            ParseOutcome::Parsed(deps) => deps,
            ParseOutcome::Unsupported | ParseOutcome::Suppressed(_) => Vec::new(),
        }
    }
}

/// Maps manifest file names to parsing strategies
///
/// Exact file names are looked up first; any other `requirements*.txt`
/// falls back to the pip requirements parser.
pub struct ManifestParserRegistry {
    parsers: HashMap<&'static str, Box<dyn ManifestParser>>,
    requirements: Box<dyn ManifestParser>,
}

impl ManifestParserRegistry {
    pub fn new() -> Self {
        let mut parsers: HashMap<&'static str, Box<dyn ManifestParser>> = HashMap::new();
        parsers.insert("package.json", Box::new(PackageJsonParser));
        parsers.insert("package-lock.json", Box::new(PackageLockParser));
        parsers.insert("requirements.txt", Box::new(RequirementsParser));
        parsers.insert("pyproject.toml", Box::new(PyprojectParser));
        parsers.insert("Pipfile", Box::new(PipfileParser));
        parsers.insert("Pipfile.lock", Box::new(PipfileLockParser));
        parsers.insert("poetry.lock", Box::new(PythonLockParser));
        parsers.insert("uv.lock", Box::new(PythonLockParser));
        parsers.insert("go.mod", Box::new(GoModParser));
        parsers.insert("Cargo.toml", Box::new(CargoTomlParser));
        parsers.insert("Cargo.lock", Box::new(CargoLockParser));
        parsers.insert("pom.xml", Box::new(PomParser));
        parsers.insert("build.gradle", Box::new(GradleParser));
        parsers.insert("build.gradle.kts", Box::new(GradleParser));

        Self {
            parsers,
            requirements: Box::new(RequirementsParser),
        }
    }

    fn is_requirements_file(file_name: &str) -> bool {
        file_name.starts_with("requirements") && file_name.ends_with(".txt")
    }

    fn parser_for(&self, file_name: &str) -> Option<&dyn ManifestParser> {
        if let Some(parser) = self.parsers.get(file_name) {
            return Some(parser.as_ref());
        }
        if Self::is_requirements_file(file_name) {
            return Some(self.requirements.as_ref());
        }
        None
    }

    /// Whether `file_name` (no directory part) is a supported manifest
    pub fn is_manifest(&self, file_name: &str) -> bool {
        self.parser_for(file_name).is_some()
    }

    /// Selects the manifest paths from a repository file listing
    pub fn detect_manifests<'a, I>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        paths
            .into_iter()
            .filter(|path| self.is_manifest(file_name(path)))
            .map(str::to_string)
            .collect()
    }

    /// Parses one manifest, keeping track of why nothing was produced
    pub fn parse_detailed(&self, path: &str, content: &str) -> ParseOutcome {
        let Some(parser) = self.parser_for(file_name(path)) else {
            return ParseOutcome::Unsupported;
        };

        match parser.parse(content, path) {
            Ok(deps) => ParseOutcome::Parsed(deps),
            Err(e) => {
                tracing::warn!(manifest = path, error = %e, "Skipping unparseable manifest");
                ParseOutcome::Suppressed(e)
            }
        }
    }

    /// Parses one manifest; unsupported or malformed manifests yield nothing
    pub fn parse(&self, path: &str, content: &str) -> Vec<Dependency> {
        self.parse_detailed(path, content).into_dependencies()
    }
}

impl Default for ManifestParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}
