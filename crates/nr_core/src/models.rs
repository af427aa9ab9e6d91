use async_trait::async_trait;
use std::fmt;
use crate::types::AiEnrichment;
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send a prompt and parse the completion. Transport failures are errors;
    /// a completion that is not JSON degrades to `AiEnrichment::Raw`.
    async fn invoke(&self, prompt: &str) -> Result<AiEnrichment>;
}
