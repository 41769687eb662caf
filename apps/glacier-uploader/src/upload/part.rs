//! Part Uploader
//!
//! Sends one chunk as one numbered part, retrying a bounded number of times
//! with a fixed pause between attempts.

use std::time::Duration;

use crate::chunk::Chunk;
use crate::error::{Result, UploadError};
use crate::storage::{CompletedPartRecord, MultipartStore, Transaction};

pub struct PartUploader<'a> {
    store: &'a dyn MultipartStore,
    retries: u32,
    retry_delay: Duration,
}

impl<'a> PartUploader<'a> {
    pub fn new(store: &'a dyn MultipartStore, retries: u32, retry_delay: Duration) -> Self {
        Self {
            store,
            retries,
            retry_delay,
        }
    }

    /// Total attempts per part, the first one included
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Upload `chunk`, making at most `retries + 1` attempts
    pub async fn upload_part(
        &self,
        transaction: &Transaction,
        chunk: &Chunk,
    ) -> Result<CompletedPartRecord> {
        let content_length = chunk.len() as i64;
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self
                .store
                .upload_part(transaction, chunk.data.clone(), content_length, chunk.part_number)
                .await
            {
                Ok(etag) => {
                    tracing::debug!(
                        part_number = chunk.part_number,
                        attempt = attempt,
                        size = content_length,
                        etag = %etag,
                        "Uploaded part"
                    );

                    return Ok(CompletedPartRecord {
                        part_number: chunk.part_number,
                        etag,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        part_number = chunk.part_number,
                        attempt = attempt,
                        max_attempts = self.max_attempts(),
                        "Part upload failed: {}",
                        e
                    );

                    if attempt > self.retries {
                        return Err(UploadError::PartUpload {
                            part_number: chunk.part_number,
                            upload_id: transaction.upload_id.clone(),
                            source: e,
                        });
                    }

                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}
