//! Upload types

use crate::checksum::IntegrityCheck;

/// Storage class every object is finalized under
pub const COLD_STORAGE_CLASS: aws_sdk_s3::types::StorageClass =
    aws_sdk_s3::types::StorageClass::DeepArchive;

/// Upper bound on parts in one multipart upload
pub const MAX_PARTS: u64 = 10_000;

/// Lifecycle of one upload run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// Nothing sent yet
    Idle,
    /// Transaction open, waiting for the next chunk
    Active,
    /// A part is in flight (including retries)
    UploadingPart,
    /// All parts sent, close in flight
    Completing,
    /// Object finalized
    Completed,
    /// Terminal failure; an open transaction is left as is
    Failed,
}

/// Success output of an upload run
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub parts: usize,
    pub bytes: u64,
    /// Location of the finalized object
    pub location: String,
    /// Composite ETag computed from the local part digests
    pub local_etag: String,
    /// Service ETag with quotes removed
    pub remote_etag: String,
    pub integrity: IntegrityCheck,
}
