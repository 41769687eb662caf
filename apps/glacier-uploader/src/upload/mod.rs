//! Chunked Upload Module
//!
//! Uploads one large file as an S3 multipart upload:
//! - MD5 digest per part, composite ETag for the whole object
//! - Sequential part upload with bounded retry
//! - ETag reconciliation after the service assembles the object
//!
//! Protocol Flow:
//! 1. Client creates a multipart upload under the Deep Archive storage class
//! 2. Client uploads each part in order and collects the part ETags
//! 3. Client completes the upload with the ordered part list
//! 4. Client compares the returned ETag with its own composite

pub mod orchestrator;
pub mod part;
pub mod progress;
pub mod types;

pub use orchestrator::{completion_order, object_key, Uploader};
pub use part::PartUploader;
pub use progress::{NoProgress, ProgressTracker, UploadProgress};
pub use types::*;
