//! Error types for the Glacier uploader

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, UploadError>;

/// Upload error type
///
/// Every variant is fatal to the run. Transient part failures are retried
/// inside the part uploader and only surface here once retries are exhausted.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("We can't resume uploads yet. It's on the roadmap. (upload id: {0})")]
    ResumeNotSupported(String),

    #[error("Invalid source path: {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("Invalid part size: {0} bytes")]
    InvalidPartSize(usize),

    #[error("Refusing to upload empty file: {}", .0.display())]
    EmptySource(PathBuf),

    #[error("File needs {parts} parts, more than the {max} a multipart upload accepts")]
    TooManyParts { parts: u64, max: u64 },

    #[error("Failed to open {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {}: {source}", path.display())]
    StatFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read a chunk for part {part_number}: {source}")]
    ChunkRead {
        part_number: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create multipart upload: {0}")]
    TransactionOpen(#[source] StorageError),

    #[error(
        "Upload not aborted. You can resume it. Not implemented yet. \
         Part {part_number} of upload {upload_id} failed: {source}"
    )]
    PartUpload {
        part_number: i32,
        upload_id: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to complete multipart upload: {0}")]
    TransactionClose(#[source] StorageError),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3 SDK error: {0}")]
    SdkError(String),

    #[error("Response missing field: {0}")]
    MissingField(&'static str),

    #[error("Request rejected: {0}")]
    Rejected(String),
}
