//! S3 multipart client
//!
//! Wraps the AWS SDK for S3-compatible storage access.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::{CompletedMultipartUpload, CompletedPart, StorageClass},
    Client,
};
use bytes::Bytes;

use crate::config::StorageConfig;
use crate::error::StorageError;

use super::types::{ClosedObject, CompletedPartRecord, Transaction};
use super::MultipartStore;

/// S3-backed [`MultipartStore`]
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    region: String,
    endpoint: Option<String>,
}

impl S3Store {
    /// Create a new S3 client from configuration
    pub async fn new(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            let credentials =
                Credentials::new(access_key, secret_key, None, None, "glacier-uploader");
            builder = builder.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            tracing::info!("Using custom S3 endpoint: {}", endpoint);
            builder = builder
                .endpoint_url(endpoint)
                .force_path_style(true); // Required for MinIO and other S3-compatible services
        }

        Self {
            client: Client::from_conf(builder.build()),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        }
    }
}

/// Object URL for services that omit `Location` on completion
fn fallback_location(endpoint: Option<&str>, region: &str, bucket: &str, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl MultipartStore for S3Store {
    async fn open_transaction(
        &self,
        bucket: &str,
        key: &str,
        storage_class: StorageClass,
    ) -> Result<Transaction, StorageError> {
        let response = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .storage_class(storage_class)
            .send()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to create upload for {}: {}", key, e)))?;

        let upload_id = response
            .upload_id()
            .ok_or(StorageError::MissingField("UploadId"))?
            .to_string();

        Ok(Transaction {
            bucket: response.bucket().unwrap_or(bucket).to_string(),
            key: response.key().unwrap_or(key).to_string(),
            upload_id,
        })
    }

    async fn upload_part(
        &self,
        transaction: &Transaction,
        body: Bytes,
        content_length: i64,
        part_number: i32,
    ) -> Result<String, StorageError> {
        let response = self
            .client
            .upload_part()
            .bucket(&transaction.bucket)
            .key(&transaction.key)
            .upload_id(&transaction.upload_id)
            .part_number(part_number)
            .content_length(content_length)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to upload part {}: {}", part_number, e)))?;

        response
            .e_tag()
            .map(|s| s.to_string())
            .ok_or(StorageError::MissingField("ETag"))
    }

    async fn close_transaction(
        &self,
        transaction: &Transaction,
        parts: &[CompletedPartRecord],
    ) -> Result<ClosedObject, StorageError> {
        let completed: Vec<CompletedPart> = parts
            .iter()
            .map(|p| {
                CompletedPart::builder()
                    .e_tag(&p.etag)
                    .part_number(p.part_number)
                    .build()
            })
            .collect();

        let response = self
            .client
            .complete_multipart_upload()
            .bucket(&transaction.bucket)
            .key(&transaction.key)
            .upload_id(&transaction.upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(completed))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to complete upload: {}", e)))?;

        Ok(ClosedObject {
            etag: response
                .e_tag()
                .ok_or(StorageError::MissingField("ETag"))?
                .to_string(),
            location: match response.location() {
                Some(location) => location.to_string(),
                None => {
                    tracing::debug!("Completion response had no Location, deriving one");
                    fallback_location(
                        self.endpoint.as_deref(),
                        &self.region,
                        &transaction.bucket,
                        &transaction.key,
                    )
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_location_for_aws() {
        assert_eq!(
            fallback_location(None, "eu-west-1", "vault", "backup.tar"),
            "https://vault.s3.eu-west-1.amazonaws.com/backup.tar"
        );
    }

    #[test]
    fn test_fallback_location_for_custom_endpoint() {
        assert_eq!(
            fallback_location(Some("http://localhost:9000/"), "us-east-1", "vault", "backup.tar"),
            "http://localhost:9000/vault/backup.tar"
        );
    }
}
