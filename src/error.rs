//! Error types
//!
//! Frame assembly cannot fail. The only runtime failure is the audio sink,
//! which is reported as a single class: [`SinkError`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Output sink failure
#[derive(Error, Debug)]
pub enum SinkError {
    /// Device or file could not be opened
    #[error("output sink failure: device unavailable: {0}")]
    Unavailable(String),

    /// Samples could not be delivered
    #[error("output sink failure: write failed: {0}")]
    Write(String),

    /// Sink could not be flushed or released
    #[error("output sink failure: close failed: {0}")]
    Close(String),

    /// Underlying I/O error
    #[error("output sink failure: {0}")]
    Io(#[from] io::Error),

    /// Playback aborted by the user
    #[error("output sink failure: interrupted")]
    Interrupted,
}

/// Errors loading or validating a transmitter configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_errors_share_one_class() {
        let errors = [
            SinkError::Unavailable("no server".into()),
            SinkError::Write("queue closed".into()),
            SinkError::Close("finalize".into()),
            SinkError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe")),
            SinkError::Interrupted,
        ];
        for err in errors {
            assert!(err.to_string().starts_with("output sink failure"));
        }
    }
}
