use super::registry::{ManifestError, ManifestParser};
use crate::dependency_audit::domain::{Dependency, Ecosystem, Scope, ANY_VERSION};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

const POM_NAMESPACE: &[u8] = b"http://maven.apache.org/POM/4.0.0";

/// `pom.xml`: every `<dependency>` element, including managed ones
pub struct PomParser;

#[derive(Default)]
struct PendingDependency {
    /// Element depth of the `<dependency>` start tag
    depth: usize,
    group_id: String,
    artifact_id: String,
    version: String,
    scope: String,
}

#[derive(Clone, Copy)]
enum Field {
    GroupId,
    ArtifactId,
    Version,
    Scope,
}

impl PendingDependency {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::GroupId => &mut self.group_id,
            Field::ArtifactId => &mut self.artifact_id,
            Field::Version => &mut self.version,
            Field::Scope => &mut self.scope,
        }
    }

    fn into_dependency(self, path: &str) -> Option<Dependency> {
        let group = self.group_id.trim();
        let artifact = self.artifact_id.trim();
        let name = if group.is_empty() {
            artifact.to_string()
        } else {
            format!("{}:{}", group, artifact)
        };
        let version = match self.version.trim() {
            "" => ANY_VERSION,
            v => v,
        };
        let scope = if self.scope.trim() == "test" {
            Scope::Test
        } else {
            Scope::Runtime
        };
        Dependency::new(Ecosystem::Maven, &name, version, scope, path)
    }
}

impl PomParser {
    fn in_pom_namespace(ns: &ResolveResult) -> bool {
        match ns {
            ResolveResult::Bound(Namespace(uri)) => *uri == POM_NAMESPACE,
            ResolveResult::Unbound => true,
            ResolveResult::Unknown(_) => false,
        }
    }

    fn field_for(local_name: &[u8]) -> Option<Field> {
        match local_name {
            b"groupId" => Some(Field::GroupId),
            b"artifactId" => Some(Field::ArtifactId),
            b"version" => Some(Field::Version),
            b"scope" => Some(Field::Scope),
            _ => None,
        }
    }
}

impl ManifestParser for PomParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let mut reader = NsReader::from_str(content);
        let mut deps = Vec::new();
        let mut depth = 0usize;
        let mut pending: Option<PendingDependency> = None;
        let mut field: Option<Field> = None;

        loop {
            let (ns, event) = reader
                .read_resolved_event()
                .map_err(|e| ManifestError::Xml(e.to_string()))?;

            match event {
                Event::Start(start) => {
                    depth += 1;
                    if !Self::in_pom_namespace(&ns) {
                        continue;
                    }
                    let local = start.local_name();
                    match pending.as_ref() {
                        None if local.as_ref() == b"dependency" => {
                            pending = Some(PendingDependency {
                                depth,
                                ..Default::default()
                            });
                        }
                        // only direct children; <exclusions> carry their own ids
                        Some(dep) if depth == dep.depth + 1 => {
                            field = Self::field_for(local.as_ref());
                        }
                        _ => {}
                    }
                }
                Event::Text(text) => {
                    if let (Some(dep), Some(f)) = (pending.as_mut(), field) {
                        let value = text
                            .unescape()
                            .map_err(|e| ManifestError::Xml(e.to_string()))?;
                        dep.field_mut(f).push_str(&value);
                    }
                }
                Event::End(_) => {
                    field = None;
                    if pending.as_ref().is_some_and(|dep| dep.depth == depth) {
                        if let Some(dep) = pending.take() {
                            deps.extend(dep.into_dependency(path));
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(ManifestError::Xml("unexpected end of document".to_string()));
        }

        Ok(deps)
    }
}
