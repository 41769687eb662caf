//! Upload Orchestrator
//!
//! Drives one multipart transaction from open to close:
//!
//! 1. Resolve the object key and reject resume requests
//! 2. Open the source and the transaction (Deep Archive storage class)
//! 3. Digest and upload each chunk in order, collecting completion records
//! 4. Close the transaction with the sorted records
//! 5. Reconcile the service ETag against the local composite
//!
//! Parts go out strictly one at a time. A part that exhausts its retries ends
//! the run and leaves the transaction open on the remote side.

use std::path::Path;

use tokio::io::AsyncRead;

use crate::checksum::{unquote_etag, CompositeEtag, IntegrityCheck};
use crate::chunk::ChunkReader;
use crate::config::UploadConfig;
use crate::error::{Result, UploadError};
use crate::storage::{CompletedPartRecord, MultipartStore, Transaction};

use super::part::PartUploader;
use super::progress::UploadProgress;
use super::types::{UploadPhase, UploadReport, COLD_STORAGE_CLASS, MAX_PARTS};

/// Runs uploads against a [`MultipartStore`]
pub struct Uploader<'a> {
    store: &'a dyn MultipartStore,
    progress: &'a dyn UploadProgress,
    phase: UploadPhase,
}

impl<'a> Uploader<'a> {
    pub fn new(store: &'a dyn MultipartStore, progress: &'a dyn UploadProgress) -> Self {
        Self {
            store,
            progress,
            phase: UploadPhase::Idle,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// Upload `config.source` to `config.bucket`
    pub async fn run(&mut self, config: &UploadConfig) -> Result<UploadReport> {
        let key = object_key(&config.source)?;

        if let Some(upload_id) = &config.upload_id {
            self.transition(UploadPhase::Failed);
            return Err(UploadError::ResumeNotSupported(upload_id.clone()));
        }

        let reader = ChunkReader::open(&config.source, config.part_size).await;
        let reader = self.fail_on_err(reader)?;

        self.upload(config, &key, reader).await
    }

    /// Upload everything `reader` yields under `key`
    pub async fn upload<R: AsyncRead + Unpin + Send>(
        &mut self,
        config: &UploadConfig,
        key: &str,
        mut reader: ChunkReader<R>,
    ) -> Result<UploadReport> {
        let expected_parts = reader.expected_parts();
        if expected_parts == 0 {
            self.transition(UploadPhase::Failed);
            return Err(UploadError::EmptySource(config.source.clone()));
        }
        if expected_parts > MAX_PARTS {
            self.transition(UploadPhase::Failed);
            return Err(UploadError::TooManyParts {
                parts: expected_parts,
                max: MAX_PARTS,
            });
        }

        let transaction = self
            .store
            .open_transaction(&config.bucket, key, COLD_STORAGE_CLASS)
            .await
            .map_err(UploadError::TransactionOpen);
        let transaction = self.fail_on_err(transaction)?;

        tracing::info!(
            bucket = %transaction.bucket,
            key = %transaction.key,
            upload_id = %transaction.upload_id,
            size = reader.total_size(),
            parts = expected_parts,
            "Opened multipart upload"
        );
        self.transition(UploadPhase::Active);
        self.progress.start(expected_parts);

        let result = self.drive(config, &transaction, &mut reader).await;
        self.progress.finish();
        result
    }

    async fn drive<R: AsyncRead + Unpin + Send>(
        &mut self,
        config: &UploadConfig,
        transaction: &Transaction,
        reader: &mut ChunkReader<R>,
    ) -> Result<UploadReport> {
        let part_uploader = PartUploader::new(self.store, config.retries, config.retry_delay);
        let mut digests = CompositeEtag::new();
        let mut completed: Vec<CompletedPartRecord> = Vec::new();

        loop {
            let chunk = reader.next_chunk().await;
            let Some(chunk) = self.fail_on_err(chunk)? else {
                break;
            };

            self.transition(UploadPhase::UploadingPart);
            digests.push_chunk(&chunk.data);

            let record = part_uploader.upload_part(transaction, &chunk).await;
            completed.push(self.fail_on_err(record)?);

            self.transition(UploadPhase::Active);
            self.progress.advance();
        }

        completion_order(&mut completed);

        self.transition(UploadPhase::Completing);
        let closed = self
            .store
            .close_transaction(transaction, &completed)
            .await
            .map_err(UploadError::TransactionClose);
        let closed = self.fail_on_err(closed)?;
        self.transition(UploadPhase::Completed);

        let local_etag = digests.finalize();
        let integrity = IntegrityCheck::compare(&closed.etag, &local_etag);

        match &integrity {
            IntegrityCheck::Match => {
                tracing::info!(etag = %local_etag, "ETags match");
            }
            IntegrityCheck::Mismatch { remote, local } => {
                tracing::warn!(remote = %remote, local = %local, "ETags don't match");
            }
        }

        Ok(UploadReport {
            bucket: transaction.bucket.clone(),
            key: transaction.key.clone(),
            upload_id: transaction.upload_id.clone(),
            parts: completed.len(),
            bytes: reader.offset(),
            location: closed.location,
            remote_etag: unquote_etag(&closed.etag).to_string(),
            local_etag,
            integrity,
        })
    }

    fn transition(&mut self, next: UploadPhase) {
        tracing::debug!(from = ?self.phase, to = ?next, "Upload phase change");
        self.phase = next;
    }

    fn fail_on_err<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.transition(UploadPhase::Failed);
        }
        result
    }
}

/// Put completion records in ascending part order
///
/// The service rejects a completion list that is not in part order.
pub fn completion_order(records: &mut [CompletedPartRecord]) {
    records.sort_by_key(|p| p.part_number);
}

/// Object key for a source file: its base name
pub fn object_key(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .ok_or_else(|| UploadError::InvalidSource(path.to_path_buf()))
}
