use thiserror::Error;

/// A story document that violates the model invariants. Rejected before any
/// rendering or export work begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("story title must not be empty")]
    EmptyTitle,

    #[error("segment {0} has empty text")]
    EmptySegmentText(usize),

    #[error("malformed generation response: {0}")]
    Malformed(String),
}

/// A single image failed to load or decode. Always recovered locally by the
/// export pipeline: the affected page is rendered text-only and the export
/// continues.
#[derive(Error, Debug, Clone)]
pub enum AssetError {
    #[error("unsupported image reference: {0}")]
    UnsupportedScheme(String),

    #[error("failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("invalid data URI: {0}")]
    DataUri(String),

    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// An unrecoverable failure while assembling the output document. Reported
/// once to the caller; no partial file is produced.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("invalid story document: {0}")]
    InvalidDocument(#[from] DocumentError),

    #[error("image fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
