use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use nr_core::{Error, ImageStorage, Result};
use std::fmt;
use std::sync::Arc;

pub struct S3ImageStorage {
    client: Arc<Client>,
    bucket: String,
    region: String,
}

impl S3ImageStorage {
    pub async fn new(bucket: &str, region: &str) -> Self {
        let config = nr_core::aws::load_sdk_config(region).await;
        Self::with_client(Client::new(&config), bucket, region)
    }

    pub fn with_client(client: Client, bucket: &str, region: &str) -> Self {
        Self {
            client: Arc::new(client),
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(&self.bucket, &self.region, key)
    }
}

impl fmt::Debug for S3ImageStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3ImageStorage")
            .field("client", &"<aws_sdk_s3::Client>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .finish()
    }
}

/// Virtual-hosted style object URL
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

#[async_trait]
impl ImageStorage for S3ImageStorage {
    async fn put_image(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| Error::ObjectStorage(format!("Failed to upload {}: {}", key, e)))?;

        Ok(self.public_url(key))
    }
}
