//! Glacier Uploader Library
//!
//! Uploads a large local file to S3 in fixed-size parts and finalizes it under
//! the Deep Archive storage class, checking the resulting multipart ETag
//! against one computed locally.
//!
//! # Modules
//!
//! - `chunk`: fixed-size sequential reads of the source
//! - `checksum`: per-part MD5 and composite ETag
//! - `storage`: the multipart store interface and its S3 implementation
//! - `upload`: part retry and the transaction driver

pub mod checksum;
pub mod chunk;
pub mod config;
pub mod error;
pub mod storage;
pub mod upload;

pub use error::{Result, StorageError, UploadError};
