// THEORY:
// Error types for cube scanning. Expected conditions (no region found,
// unidentifiable face, an invalid but well-formed state) are returned as data.
// `ScanError` is reserved for contract violations, for refusing a solver
// handoff and for session plumbing failures.

use thiserror::Error;

/// Errors raised by the scanning pipeline.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("A face observation needs exactly 9 facelets, got {0}")]
    WrongFaceletCount(usize),

    #[error("Confidence must be a finite value in [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("Invalid color letter: {0:?}")]
    InvalidColor(char),

    #[error("Invalid face letter: {0:?}")]
    InvalidFaceLetter(char),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Scan incomplete, missing faces: {missing}")]
    Incomplete { missing: String },

    #[error("Cube state failed validation: {}", .0.join("; "))]
    InvalidState(Vec<String>),

    #[error("Scan session {0} is closed")]
    SessionClosed(u64),

    #[error("Scan sessions need a running tokio runtime")]
    NoRuntime,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for cube scanning.
pub type Result<T> = std::result::Result<T, ScanError>;
