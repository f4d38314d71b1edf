use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for zhip operations
pub type Result<T> = std::result::Result<T, ZhipError>;

/// Unified error type for all zhip operations
#[derive(Debug, Error)]
pub enum ZhipError {
    // Mapping errors
    #[error("Key not found in archive: {0}")]
    NotFound(String),

    #[error("Value must be a byte sequence, got {0}")]
    InvalidValue(String),

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Archive opened read-only: {}", .0.display())]
    ReadOnly(PathBuf),

    // Archive library errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ZhipError {
    fn from(err: toml::de::Error) -> Self {
        ZhipError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ZhipError::NotFound("missing".to_string());
        assert_eq!(err.to_string(), "Key not found in archive: missing");

        let err = ZhipError::ReadOnly(PathBuf::from("data.zip"));
        assert_eq!(err.to_string(), "Archive opened read-only: data.zip");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err: ZhipError = io_err.into();
        assert!(matches!(err, ZhipError::Io(ref e) if e.kind() == io::ErrorKind::PermissionDenied));
    }
}
