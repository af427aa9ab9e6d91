use nr_core::{Error, InferenceModel, Result};
use std::sync::Arc;
use tracing::info;
use crate::InferenceConfig;

pub mod bedrock;
pub mod chat;
pub mod dummy;

pub use bedrock::BedrockModel;
pub use chat::ChatModel;
pub use dummy::DummyModel;

pub async fn create_model(config: &InferenceConfig) -> Result<Arc<dyn InferenceModel>> {
    let model: Arc<dyn InferenceModel> = match config.backend.as_str() {
        "bedrock" => Arc::new(BedrockModel::new(&config.model_id, &config.region).await),
        "chat" => Arc::new(ChatModel::new(
            &config.model_id,
            config.base_url.clone(),
            config.api_key.clone(),
        )),
        "dummy" => Arc::new(DummyModel::new()),
        other => {
            return Err(Error::Config(format!(
                "Unknown inference backend: {}. Available: bedrock, chat, dummy",
                other
            )));
        }
    };
    info!("🧠 Inference model ready (using {} / {})", model.name(), config.model_id);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_model_by_name() {
        let config = InferenceConfig {
            backend: "dummy".to_string(),
            ..Default::default()
        };
        let model = create_model(&config).await.unwrap();
        assert_eq!(model.name(), "Dummy");

        let config = InferenceConfig {
            backend: "chat".to_string(),
            model_id: "deepseek-chat".to_string(),
            ..Default::default()
        };
        assert_eq!(create_model(&config).await.unwrap().name(), "Chat");
    }

    #[tokio::test]
    async fn test_unknown_model_is_config_error() {
        let config = InferenceConfig {
            backend: "oracle".to_string(),
            ..Default::default()
        };
        assert!(matches!(create_model(&config).await, Err(Error::Config(_))));
    }
}
