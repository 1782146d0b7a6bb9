use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that can occur while driving a benchmark run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// File system read/write/stat failure.
    #[error("I/O failure during {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Requested compression level outside the backend's supported range.
    #[error("{codec} does not support level {level} (valid range {min}..={max})")]
    InvalidLevel {
        codec: &'static str,
        level: i32,
        min: i32,
        max: i32,
    },

    /// Decompression could not parse its input.
    #[error("{codec} artifact is corrupt: {source}")]
    CorruptArtifact {
        codec: &'static str,
        #[source]
        source: io::Error,
    },

    /// A trial produced an empty artifact, which would make the ratio undefined.
    #[error("artifact {path} is zero bytes, ratio is undefined")]
    ZeroByteArtifact { path: PathBuf },

    /// A trial failed; carries the (codec, level) pair that was running.
    #[error("trial {codec} level {level} failed: {source}")]
    Trial {
        codec: String,
        level: i32,
        #[source]
        source: Box<HarnessError>,
    },

    /// The run was cancelled while a trial was in flight.
    #[error("benchmark run cancelled")]
    Cancelled,

    /// The external visualization sink could not be reached.
    #[error("failed to publish results: {0}")]
    Publish(#[from] reqwest::Error),

    /// The external visualization sink rejected the payload.
    #[error("visualization sink rejected results: {0}")]
    PublishRejected(String),
}

impl HarnessError {
    /// Wraps an `io::Error` with a short description of the failing operation.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        HarnessError::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Tags an error with the (codec, level) pair whose trial it aborted.
    pub fn in_trial(self, codec: &str, level: i32) -> Self {
        HarnessError::Trial {
            codec: codec.to_string(),
            level,
            source: Box::new(self),
        }
    }
}
