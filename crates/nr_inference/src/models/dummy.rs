use nr_core::{AiEnrichment, InferenceModel, Result};
use serde_json::json;
use std::fmt;

/// Offline model for local runs. Echoes the prompt's title as the headline and
/// the first 20 words of the body as the summary.
#[derive(Default)]
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

fn prompt_field<'a>(prompt: &'a str, label: &str) -> &'a str {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix(label))
        .map(str::trim)
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn invoke(&self, prompt: &str) -> Result<AiEnrichment> {
        let title = prompt_field(prompt, "Title:");
        let body = prompt_field(prompt, "Body:");
        let summary = body.split_whitespace().take(20).collect::<Vec<_>>().join(" ");

        let completion = json!({
            "category": "general",
            "rewritten_headline": title,
            "summary": summary,
            "hashtags": ["#news"],
        });
        Ok(AiEnrichment::parse(&completion.to_string()))
    }
}
