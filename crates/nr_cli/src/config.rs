use clap::Args;
use nr_inference::InferenceConfig;
use nr_storage::{ImageConfig, StorageConfig};
use std::path::PathBuf;

/// Every setting can come from a flag or the environment. Missing values are
/// not validated up front; they surface as failures of the call that needs them.
#[derive(Args, Debug, Clone)]
pub struct AppConfig {
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1", global = true)]
    pub region: String,

    #[arg(long, env = "S3_BUCKET_NAME", default_value = "", global = true)]
    pub bucket: String,

    #[arg(long, env = "DDB_TABLE_NAME", default_value = "", global = true)]
    pub table: String,

    #[arg(long, env = "BEDROCK_MODEL_ID", default_value = nr_inference::DEFAULT_MODEL_ID, global = true)]
    pub model_id: String,

    #[arg(long, env = "API_AUTH_KEY", default_value = "", hide_env_values = true, global = true)]
    pub api_key: String,

    /// Article store: dynamodb, sqlite or memory
    #[arg(long, env = "NR_STORAGE", default_value = "dynamodb", global = true)]
    pub storage: String,

    #[arg(long, env = "NR_SQLITE_PATH", default_value = "articles.db", global = true)]
    pub sqlite_path: PathBuf,

    /// Image store: s3 or memory
    #[arg(long, env = "NR_IMAGES", default_value = "s3", global = true)]
    pub images: String,

    /// Inference backend: bedrock, chat or dummy
    #[arg(long, env = "NR_MODEL", default_value = "bedrock", global = true)]
    pub model: String,

    /// Base URL for the chat backend
    #[arg(long, env = "NR_MODEL_URL", global = true)]
    pub model_url: Option<String>,

    #[arg(long, env = "NR_MODEL_API_KEY", hide_env_values = true, global = true)]
    pub model_api_key: Option<String>,

    #[arg(long, env = "NR_BIND", default_value = "0.0.0.0:3000", global = true)]
    pub bind: String,
}

impl AppConfig {
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            backend: self.storage.clone(),
            table: self.table.clone(),
            region: self.region.clone(),
            sqlite_path: self.sqlite_path.clone(),
        }
    }

    pub fn image_config(&self) -> ImageConfig {
        ImageConfig {
            backend: self.images.clone(),
            bucket: self.bucket.clone(),
            region: self.region.clone(),
        }
    }

    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            backend: self.model.clone(),
            model_id: self.model_id.clone(),
            region: self.region.clone(),
            base_url: self.model_url.clone(),
            api_key: self.model_api_key.clone(),
        }
    }
}
