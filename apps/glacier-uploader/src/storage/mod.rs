//! Storage module for S3-compatible backends
//!
//! The upload driver talks to the service only through [`MultipartStore`].

mod s3_client;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use s3_client::S3Store;
pub use types::*;

use async_trait::async_trait;
use aws_sdk_s3::types::StorageClass;
use bytes::Bytes;

use crate::error::StorageError;

/// The three calls of a multipart upload transaction
#[async_trait]
pub trait MultipartStore: Send + Sync {
    /// Begin a multipart upload and return its handle
    async fn open_transaction(
        &self,
        bucket: &str,
        key: &str,
        storage_class: StorageClass,
    ) -> Result<Transaction, StorageError>;

    /// Store one part and return the part ETag the service issued
    async fn upload_part(
        &self,
        transaction: &Transaction,
        body: Bytes,
        content_length: i64,
        part_number: i32,
    ) -> Result<String, StorageError>;

    /// Finish the upload; `parts` must be sorted by part number
    async fn close_transaction(
        &self,
        transaction: &Transaction,
        parts: &[CompletedPartRecord],
    ) -> Result<ClosedObject, StorageError>;
}
