pub mod models;
pub mod prompt;

pub use models::create_model;
pub use prompt::build_prompt;

pub const DEFAULT_MODEL_ID: &str = "amazon.titan-text-instruct";

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// `bedrock`, `chat` or `dummy`
    pub backend: String,
    pub model_id: String,
    pub region: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: "bedrock".to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            region: nr_core::aws::DEFAULT_REGION.to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::{build_prompt, InferenceConfig};
    pub use nr_core::{AiEnrichment, Error, InferenceModel, Result};
}
