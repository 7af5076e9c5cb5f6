use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use url::Url;

use crate::{
    config::StorageSettings,
    domain::{models::StorageKey, ports::outbound::ObjectStorage, StorageError},
};

const CACHE_CONTROL: &str = "max-age=86400";
const CREDENTIALS_SOURCE: &str = "wardrobe-settings";

struct Bucket {
    client: Client,
    name: String,
    public_base_url: Url,
}

/// S3 (or S3-compatible) avatar storage.
///
/// Built from explicit [`StorageSettings`]; when bucket or credentials are
/// missing the adapter still constructs but reports itself unconfigured.
pub struct S3ObjectStorage {
    bucket: Option<Bucket>,
    public_read: bool,
}

impl S3ObjectStorage {
    pub fn new(settings: &StorageSettings) -> Result<Self, StorageError> {
        let Some(credentials) = settings.credentials() else {
            tracing::warn!("object storage is not configured; avatar uploads are disabled");
            return Ok(Self {
                bucket: None,
                public_read: settings.public_read,
            });
        };

        let public_base_url = settings
            .public_base_url()
            .ok_or(StorageError::NotConfigured)?;
        let public_base_url =
            Url::parse(&public_base_url).map_err(|err| StorageError::InvalidUrl(err.to_string()))?;

        let mut config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(Credentials::new(
                credentials.access_key_id,
                credentials.secret_access_key,
                None,
                None,
                CREDENTIALS_SOURCE,
            ));

        if let Some(endpoint) = settings.endpoint_url.as_deref() {
            tracing::debug!(endpoint = %endpoint, "using custom object storage endpoint");
            config = config.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %credentials.bucket, region = %settings.region, "object storage configured");

        Ok(Self {
            bucket: Some(Bucket {
                client: Client::from_conf(config.build()),
                name: credentials.bucket.to_string(),
                public_base_url,
            }),
            public_read: settings.public_read,
        })
    }

    fn bucket(&self) -> Result<&Bucket, StorageError> {
        self.bucket.as_ref().ok_or(StorageError::NotConfigured)
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    fn is_configured(&self) -> bool {
        self.bucket.is_some()
    }

    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let bucket = self.bucket()?;
        let size = bytes.len();

        let mut request = bucket
            .client
            .put_object()
            .bucket(&bucket.name)
            .key(key.as_str())
            .content_type(content_type)
            .cache_control(CACHE_CONTROL)
            .body(ByteStream::from(bytes));

        if self.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request.send().await.map_err(|err| {
            let message = DisplayErrorContext(&err).to_string();
            tracing::error!(key = %key, "S3 put_object failed: {}", message);
            StorageError::Request(message)
        })?;

        tracing::debug!(bucket = %bucket.name, key = %key, size, "object uploaded");
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        let bucket = self.bucket()?;

        bucket
            .client
            .delete_object()
            .bucket(&bucket.name)
            .key(key.as_str())
            .send()
            .await
            .map_err(|err| StorageError::Request(DisplayErrorContext(&err).to_string()))?;

        tracing::debug!(bucket = %bucket.name, key = %key, "object deleted");
        Ok(())
    }

    fn url_for(&self, key: &StorageKey) -> Result<String, StorageError> {
        let bucket = self.bucket()?;

        bucket
            .public_base_url
            .join(key.as_str())
            .map(String::from)
            .map_err(|err| StorageError::InvalidUrl(format!("{key}: {err}")))
    }
}
