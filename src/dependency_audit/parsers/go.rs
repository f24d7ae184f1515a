use super::registry::{ManifestError, ManifestParser};
use crate::dependency_audit::domain::{Dependency, Ecosystem, Scope};

/// `go.mod`: `require` lines and blocks
pub struct GoModParser;

#[derive(Clone, Copy, PartialEq)]
enum Block {
    TopLevel,
    Require,
    Other,
}

impl GoModParser {
    const OTHER_DIRECTIVES: &'static [&'static str] =
        &["module", "go", "toolchain", "replace", "exclude", "retract", "godebug"];

    fn requirement(line: &str, path: &str) -> Option<Dependency> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;
        let version = tokens.next()?;
        Dependency::new(Ecosystem::Go, name, version, Scope::Runtime, path)
    }
}

impl ManifestParser for GoModParser {
    fn parse(&self, content: &str, path: &str) -> Result<Vec<Dependency>, ManifestError> {
        let mut deps = Vec::new();
        let mut block = Block::TopLevel;

        for raw in content.lines() {
            let line = raw.split("//").next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if block != Block::TopLevel {
                if line == ")" {
                    block = Block::TopLevel;
                } else if block == Block::Require {
                    deps.extend(Self::requirement(line, path));
                }
                continue;
            }

            let (directive, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();
            let opens_block = rest == "(";

            if directive == "require" {
                if opens_block {
                    block = Block::Require;
                } else {
                    deps.extend(Self::requirement(rest, path));
                }
            } else if Self::OTHER_DIRECTIVES.contains(&directive) {
                if opens_block {
                    block = Block::Other;
                }
            } else {
                deps.extend(Self::requirement(line, path));
            }
        }

        Ok(deps)
    }
}
