use async_trait::async_trait;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use nr_core::{AiEnrichment, Error, InferenceModel, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest<'a> {
    input_text: &'a str,
}

#[derive(Deserialize)]
struct TitanResponse {
    results: Vec<TitanResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResult {
    output_text: String,
}

pub struct BedrockModel {
    client: Arc<Client>,
    model_id: String,
}

impl BedrockModel {
    pub async fn new(model_id: &str, region: &str) -> Self {
        let config = nr_core::aws::load_sdk_config(region).await;
        Self::with_client(Client::new(&config), model_id)
    }

    pub fn with_client(client: Client, model_id: &str) -> Self {
        Self {
            client: Arc::new(client),
            model_id: model_id.to_string(),
        }
    }
}

impl fmt::Debug for BedrockModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockModel")
            .field("client", &"<aws_sdk_bedrockruntime::Client>")
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// Titan text models wrap the completion in `{"results":[{"outputText":..}]}`.
/// Anything else is treated as the completion itself.
pub fn completion_text(body: &str) -> String {
    match serde_json::from_str::<TitanResponse>(body) {
        Ok(response) => match response.results.into_iter().next() {
            Some(result) => result.output_text,
            None => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl InferenceModel for BedrockModel {
    fn name(&self) -> &str {
        "Bedrock"
    }

    async fn invoke(&self, prompt: &str) -> Result<AiEnrichment> {
        let request = serde_json::to_vec(&InvokeRequest { input_text: prompt })?;

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .body(Blob::new(request))
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Bedrock invocation failed: {}", e)))?;

        let body = String::from_utf8_lossy(response.body().as_ref()).into_owned();
        debug!("Bedrock returned {} bytes", body.len());
        let text = completion_text(&body);
        Ok(AiEnrichment::parse(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_string(&InvokeRequest { input_text: "hello" }).unwrap();
        assert_eq!(body, r#"{"inputText":"hello"}"#);
    }

    #[test]
    fn test_completion_text_unwraps_titan_envelope() {
        let body = r#"{"inputTextTokenCount":12,"results":[{"tokenCount":30,"outputText":"{\"category\":\"tech\"}","completionReason":"FINISH"}]}"#;
        assert_eq!(completion_text(body), r#"{"category":"tech"}"#);
        assert!(matches!(
            AiEnrichment::parse(&completion_text(body)),
            AiEnrichment::Structured(_)
        ));
    }

    #[test]
    fn test_completion_text_passes_other_bodies_through() {
        let direct = r##"{"category":"tech","hashtags":["#ai"]}"##;
        assert_eq!(completion_text(direct), direct);
        assert_eq!(completion_text("plain words"), "plain words");
        assert_eq!(completion_text(r#"{"results":[]}"#), r#"{"results":[]}"#);
    }
}
