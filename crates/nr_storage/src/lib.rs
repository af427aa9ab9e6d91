use nr_core::{ArticleStorage, Error, ImageStorage, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

pub use nr_core::aws::DEFAULT_REGION;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// `dynamodb`, `sqlite` or `memory`
    pub backend: String,
    pub table: String,
    pub region: String,
    pub sqlite_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "dynamodb".to_string(),
            table: String::new(),
            region: DEFAULT_REGION.to_string(),
            sqlite_path: PathBuf::from("articles.db"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// `s3` or `memory`
    pub backend: String,
    pub bucket: String,
    pub region: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            backend: "s3".to_string(),
            bucket: String::new(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

pub async fn create_storage(config: &StorageConfig) -> Result<Arc<dyn ArticleStorage>> {
    let storage: Arc<dyn ArticleStorage> = match config.backend.as_str() {
        "dynamodb" => Arc::new(DynamoDbStorage::new(&config.table, &config.region).await),
        "memory" => Arc::new(InMemoryStorage::new()),
        #[cfg(feature = "sqlite")]
        "sqlite" => Arc::new(SQLiteStorage::new_with_path(&config.sqlite_path).await?),
        other => {
            return Err(Error::Config(format!("Unknown storage backend: {}", other)));
        }
    };
    info!("🏦 Article storage ready (using {})", config.backend);
    Ok(storage)
}

pub async fn create_image_storage(config: &ImageConfig) -> Result<Arc<dyn ImageStorage>> {
    let storage: Arc<dyn ImageStorage> = match config.backend.as_str() {
        "s3" => Arc::new(S3ImageStorage::new(&config.bucket, &config.region).await),
        "memory" => Arc::new(InMemoryImageStorage::new()),
        other => {
            return Err(Error::Config(format!("Unknown image storage backend: {}", other)));
        }
    };
    info!("🖼️ Image storage ready (using {})", config.backend);
    Ok(storage)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_image_storage, create_storage, ImageConfig, StorageConfig};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_backends() {
        let config = StorageConfig {
            backend: "memory".to_string(),
            ..Default::default()
        };
        let storage = create_storage(&config).await.unwrap();
        assert!(storage.scan(10).await.unwrap().is_empty());

        let images = create_image_storage(&ImageConfig {
            backend: "memory".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        let url = images.put_image("k", vec![1], "image/jpeg").await.unwrap();
        assert_eq!(url, "memory://k");
    }

    #[tokio::test]
    async fn test_unknown_backend_is_config_error() {
        let config = StorageConfig {
            backend: "cassandra".to_string(),
            ..Default::default()
        };
        assert!(matches!(create_storage(&config).await, Err(Error::Config(_))));

        let config = ImageConfig {
            backend: "ftp".to_string(),
            ..Default::default()
        };
        assert!(matches!(create_image_storage(&config).await, Err(Error::Config(_))));
    }
}
