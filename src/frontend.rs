//! Front-end seam: turning input files into something the engine can query

use crate::host::Host;
use std::path::Path;
use thiserror::Error;

/// Error while loading an input file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// A front end parses and resolves one kind of input file
pub trait Frontend: Send + Sync {
    /// Front-end identifier (e.g., "snapshot")
    fn id(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// File extensions this front end handles (without dot)
    fn extensions(&self) -> &[&str];

    /// Load file content into a queryable host
    fn load(&self, content: &str, path: &Path) -> Result<Box<dyn Host>, LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::Invalid("type with empty name".to_string());
        assert_eq!(format!("{}", err), "Invalid input: type with empty name");
    }
}
