//! S3-compatible object storage via `aws-sdk-s3`.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use teckel_core::storage::{ObjectStorage, StorageError, UploadOptions};

use crate::config::StorageConfig;

/// Uploads with `PutObject`. Objects must be publicly readable through the
/// bucket policy or a CDN in front of it; no ACL is set per object.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    region: Option<String>,
    public_base_url: Option<String>,
}

impl S3Storage {
    pub fn new(
        client: aws_sdk_s3::Client,
        region: Option<String>,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            client,
            region,
            public_base_url: public_base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Build a client from the AWS config chain, overriding region and
    /// endpoint when configured.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.s3_region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .or_else(|| config.s3_region.clone());

        Self::new(
            aws_sdk_s3::Client::from_conf(builder.build()),
            region,
            config.public_base_url.clone(),
        )
    }
}

/// Classify a failed request from its HTTP status and S3 error code.
fn classify(status: Option<u16>, code: Option<&str>, message: String) -> StorageError {
    match (status, code) {
        (Some(412), _) | (_, Some("PreconditionFailed")) => StorageError::AlreadyExists(message),
        (Some(401 | 403), _) | (_, Some("AccessDenied" | "InvalidAccessKeyId")) => {
            StorageError::Permission(message)
        }
        (_, Some("QuotaExceeded" | "ServiceQuotaExceeded")) | (Some(507), _) => {
            StorageError::Quota(message)
        }
        (Some(500..=599), _) => StorageError::Network(message),
        _ => StorageError::Backend(message),
    }
}

fn map_put_error(err: SdkError<PutObjectError>) -> StorageError {
    let message = DisplayErrorContext(&err).to_string();
    if matches!(err, SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)) {
        return StorageError::Network(message);
    }
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.as_service_error().and_then(|e| e.code());
    classify(status, code, message)
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        let size = bytes.len();
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(&options.content_type)
            .cache_control(&options.cache_control)
            .body(ByteStream::from(bytes));
        if !options.overwrite {
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|err| {
            let mapped = map_put_error(err);
            tracing::error!(bucket, key, error = %mapped, "S3 upload failed");
            mapped
        })?;

        tracing::debug!(bucket, key, size, "Uploaded object to S3");
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        match (&self.public_base_url, &self.region) {
            (Some(base), _) => format!("{base}/{bucket}/{key}"),
            (None, Some(region)) => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
            (None, None) => format!("https://{bucket}.s3.amazonaws.com/{key}"),
        }
    }
}
