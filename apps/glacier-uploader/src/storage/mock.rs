//! Scripted in-memory store for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_s3::types::StorageClass;
use bytes::Bytes;

use crate::checksum;
use crate::error::StorageError;

use super::types::{ClosedObject, CompletedPartRecord, Transaction};
use super::MultipartStore;

pub const UPLOAD_ID: &str = "test-upload-id";

/// Records every call and fails on demand
#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockState>,
    fail_open: bool,
    fail_close: bool,
    remote_etag: Option<String>,
    part_failures: HashMap<i32, u32>,
}

#[derive(Default)]
pub struct MockState {
    pub opened: Vec<(String, String, StorageClass)>,
    /// (part number, content length, body length) per attempt that succeeded
    pub parts: Vec<(i32, i64, usize)>,
    pub attempts: HashMap<i32, u32>,
    pub part_digests: Vec<checksum::PartDigest>,
    pub closed_with: Option<Vec<CompletedPartRecord>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn failing_close() -> Self {
        Self {
            fail_close: true,
            ..Self::default()
        }
    }

    /// Make `part_number` fail `times` attempts before succeeding
    pub fn with_part_failures(mut self, part_number: i32, times: u32) -> Self {
        self.part_failures.insert(part_number, times);
        self
    }

    /// Report this ETag on close instead of the real composite
    pub fn with_remote_etag(mut self, etag: &str) -> Self {
        self.remote_etag = Some(etag.to_string());
        self
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl MultipartStore for MockStore {
    async fn open_transaction(
        &self,
        bucket: &str,
        key: &str,
        storage_class: StorageClass,
    ) -> Result<Transaction, StorageError> {
        if self.fail_open {
            return Err(StorageError::Rejected("open refused".to_string()));
        }

        self.state()
            .opened
            .push((bucket.to_string(), key.to_string(), storage_class));

        Ok(Transaction {
            bucket: bucket.to_string(),
            key: key.to_string(),
            upload_id: UPLOAD_ID.to_string(),
        })
    }

    async fn upload_part(
        &self,
        _transaction: &Transaction,
        body: Bytes,
        content_length: i64,
        part_number: i32,
    ) -> Result<String, StorageError> {
        let mut state = self.state();
        let attempt = state.attempts.entry(part_number).or_insert(0);
        *attempt += 1;

        let failures = self.part_failures.get(&part_number).copied().unwrap_or(0);
        if *attempt <= failures {
            return Err(StorageError::Rejected(format!(
                "part {} attempt {} refused",
                part_number, attempt
            )));
        }

        let digest = checksum::digest(&body);
        state.part_digests.push(digest);
        state.parts.push((part_number, content_length, body.len()));

        Ok(format!("\"{}\"", digest.to_hex()))
    }

    async fn close_transaction(
        &self,
        transaction: &Transaction,
        parts: &[CompletedPartRecord],
    ) -> Result<ClosedObject, StorageError> {
        if self.fail_close {
            return Err(StorageError::Rejected("close refused".to_string()));
        }

        let mut state = self.state();
        state.closed_with = Some(parts.to_vec());

        let etag = match &self.remote_etag {
            Some(etag) => etag.clone(),
            None => format!(
                "\"{}\"",
                checksum::finalize(&state.part_digests, state.part_digests.len())
            ),
        };

        Ok(ClosedObject {
            etag,
            location: format!(
                "https://{}.s3.amazonaws.com/{}",
                transaction.bucket, transaction.key
            ),
        })
    }
}
