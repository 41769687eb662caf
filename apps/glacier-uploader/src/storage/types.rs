//! Storage types

/// An open multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

/// A part the service has durably accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPartRecord {
    pub part_number: i32,
    pub etag: String,
}

/// Result of completing a multipart upload
#[derive(Debug, Clone)]
pub struct ClosedObject {
    /// ETag as returned by the service, quotes included
    pub etag: String,
    pub location: String,
}
