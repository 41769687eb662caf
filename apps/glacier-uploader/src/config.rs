//! Configuration management for the Glacier uploader

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::chunk::DEFAULT_PART_SIZE;

/// Region used when none is given
pub const DEFAULT_REGION: &str = "us-east-1";

/// Extra attempts after a failed part upload
pub const DEFAULT_RETRIES: u32 = 2;

/// Pause between part upload attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(15);

/// Connection settings for the storage service
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...)
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl StorageConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
            access_key: None,
            secret_key: None,
        }
    }

    /// Read optional endpoint and credential overrides from the environment
    pub fn from_env(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: non_empty_var("S3_ENDPOINT"),
            access_key: non_empty_var("S3_ACCESS_KEY"),
            secret_key: non_empty_var("S3_SECRET_KEY"),
        }
    }
}

/// Everything one upload run needs
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub bucket: String,
    pub source: PathBuf,
    /// Identifier of a previous upload to resume
    pub upload_id: Option<String>,
    pub part_size: usize,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl UploadConfig {
    pub fn new(bucket: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            bucket: bucket.into(),
            source: source.into(),
            upload_id: None,
            part_size: DEFAULT_PART_SIZE,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Empty identifiers are treated as absent
    pub fn with_upload_id(mut self, upload_id: Option<String>) -> Self {
        self.upload_id = upload_id.filter(|id| !id.is_empty());
        self
    }

    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }

    pub fn with_retries(mut self, retries: u32, retry_delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Apply `UPLOAD_PART_RETRIES` and `UPLOAD_RETRY_DELAY_SECS` if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(retries) = non_empty_var("UPLOAD_PART_RETRIES").and_then(|v| v.parse().ok()) {
            self.retries = retries;
        }
        if let Some(secs) = non_empty_var("UPLOAD_RETRY_DELAY_SECS").and_then(|v| v.parse().ok()) {
            self.retry_delay = Duration::from_secs(secs);
        }
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
