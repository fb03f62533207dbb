//! Manifest error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The manifest is not valid YAML or does not match the manifest shape.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The manifest parsed but is inconsistent.
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// Result type alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_path() {
        let err = ManifestError::Read {
            path: PathBuf::from("/tmp/api.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/api.yaml"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn invalid_display() {
        let err = ManifestError::Invalid("duplicate schema 'Widget'".into());
        assert_eq!(err.to_string(), "invalid manifest: duplicate schema 'Widget'");
    }
}
