//! Snapshot front end
//!
//! Loads YAML/JSON compilation snapshots exported by a language front end.

mod compilation;
mod parser;

pub use compilation::Compilation;
pub use parser::{AnnotationDecl, ClassDecl, MemberDecl, Snapshot, SyntaxDecl, TypeDecl};

use crate::frontend::{Frontend, LoadError};
use crate::host::Host;
use std::path::Path;

/// Front end for `*.yaml`, `*.yml` and `*.json` snapshots
pub struct SnapshotFrontend {
    extensions: Vec<&'static str>,
}

impl Default for SnapshotFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFrontend {
    pub fn new() -> Self {
        Self {
            extensions: vec!["yaml", "yml", "json"],
        }
    }
}

impl Frontend for SnapshotFrontend {
    fn id(&self) -> &str {
        "snapshot"
    }

    fn description(&self) -> &str {
        "Compilation snapshots (YAML/JSON) exported by a language front end"
    }

    fn extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn load(&self, content: &str, path: &Path) -> Result<Box<dyn Host>, LoadError> {
        let compilation = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Compilation::from_json(content, path)?,
            _ => Compilation::from_yaml(content, path)?,
        };
        Ok(Box::new(compilation))
    }
}
