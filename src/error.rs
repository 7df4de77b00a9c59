use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by the loaders and the volume writer.
///
/// The pixel transforms themselves never fail: structurally invalid images
/// are rejected with [`ViewerError::InvalidInput`] when an `Image` is built.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Invalid image data: {0}")]
    InvalidInput(String),

    #[error("No DICOM files found in {}", .dir.display())]
    EmptySeries { dir: PathBuf },

    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ViewerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message_names_the_file() {
        let err = ViewerError::decode("scan/001.dcm", anyhow::anyhow!("Missing or invalid Rows tag"));
        assert_eq!(
            err.to_string(),
            "Failed to decode scan/001.dcm: Missing or invalid Rows tag"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_series_message() {
        let err = ViewerError::EmptySeries { dir: PathBuf::from("/data/ct") };
        assert_eq!(err.to_string(), "No DICOM files found in /data/ct");
    }
}
