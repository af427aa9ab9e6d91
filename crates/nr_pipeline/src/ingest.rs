use nr_core::storage::image_key;
use nr_core::{fingerprint, AiEnrichment, Article, ArticleStorage, ImageStorage, InferenceModel};
use nr_inference::build_prompt;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use crate::request::{decode_image, IngestEvent, IngestRequest, ValidationError};
use crate::response::{HandlerResponse, MISSING_FIELDS, UNAUTHORIZED};

pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Internal(#[from] nr_core::Error),
}

impl IngestError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Validation(_) => 422,
            Self::Internal(_) => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Content was already stored; nothing else happened.
    Deduped { fingerprint: String },
    Created { fingerprint: String, ai: AiEnrichment },
}

impl IngestOutcome {
    pub fn fingerprint(&self) -> &str {
        match self {
            Self::Deduped { fingerprint } | Self::Created { fingerprint, .. } => fingerprint,
        }
    }

    pub fn into_response(self) -> nr_core::Result<HandlerResponse> {
        Ok(match self {
            Self::Deduped { fingerprint } => HandlerResponse::json(
                200,
                json!({ "deduped": true, "fingerprint": fingerprint }),
            ),
            Self::Created { fingerprint, ai } => HandlerResponse::json(
                201,
                json!({ "created": true, "fingerprint": fingerprint, "ai": ai.to_value()? }),
            ),
        })
    }
}

/// Dedupe-and-persist: auth, validate, fingerprint, existence check, optional
/// image upload, inference, conditional insert.
///
/// Side effects are not transactional. If the insert fails after an image was
/// uploaded the object stays in the bucket; its key is derived from the
/// fingerprint, so on a conflict it is the same object the winning record
/// points at.
pub struct IngestWorkflow {
    storage: Arc<dyn ArticleStorage>,
    images: Arc<dyn ImageStorage>,
    inference: Arc<dyn InferenceModel>,
    api_key: String,
}

impl IngestWorkflow {
    /// An empty `api_key` rejects every request, including ones that send no
    /// `x-api-key` header.
    pub fn new(
        storage: Arc<dyn ArticleStorage>,
        images: Arc<dyn ImageStorage>,
        inference: Arc<dyn InferenceModel>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            images,
            inference,
            api_key: api_key.into(),
        }
    }

    /// Runs the workflow and renders the result. Failures are logged here and
    /// reduced to a status code with a generic message.
    pub async fn handle(&self, event: &IngestEvent) -> HandlerResponse {
        let result = match self.ingest(event).await {
            Ok(outcome) => outcome.into_response().map_err(IngestError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => response,
            Err(IngestError::Unauthorized) => {
                warn!("🔒 Rejected ingest request with bad or missing API key");
                HandlerResponse::text(401, UNAUTHORIZED)
            }
            Err(IngestError::Validation(e)) => {
                warn!("⚠️ Rejected ingest request: {}", e);
                HandlerResponse::text(422, MISSING_FIELDS)
            }
            Err(IngestError::Internal(e)) => {
                error!("❌ Ingest error: {}", e);
                HandlerResponse::internal_error()
            }
        }
    }

    pub async fn ingest(&self, event: &IngestEvent) -> Result<IngestOutcome, IngestError> {
        if !event.is_authorized(&self.api_key) {
            return Err(IngestError::Unauthorized);
        }
        let payload = event.payload()?;
        let request = IngestRequest::from_payload(&payload)?;
        self.ingest_request(request).await
    }

    /// The workflow past the boundary checks.
    pub async fn ingest_request(&self, request: IngestRequest) -> Result<IngestOutcome, IngestError> {
        let fingerprint = fingerprint(&request.title, &request.body);

        if self.storage.exists(&fingerprint).await? {
            info!("⏭️ Skipping duplicate article {}", fingerprint);
            return Ok(IngestOutcome::Deduped { fingerprint });
        }

        let image_url = match request.image_base64.as_deref() {
            Some(encoded) => {
                let key = image_key(&fingerprint);
                let bytes = decode_image(encoded);
                let url = self.images.put_image(&key, bytes, IMAGE_CONTENT_TYPE).await?;
                info!("🖼️ Uploaded image {}", key);
                Some(url)
            }
            None => None,
        };

        let prompt = build_prompt(
            &request.title,
            &request.body,
            request.source.as_deref().unwrap_or_default(),
            request.url.as_deref().unwrap_or_default(),
        );
        info!("🤖 Enriching article {} with {}", fingerprint, self.inference.name());
        let ai = self.inference.invoke(&prompt).await?;
        if let AiEnrichment::Raw { .. } = ai {
            warn!("Model output for {} was not JSON, keeping raw text", fingerprint);
        }

        let article = Article::new(
            fingerprint.clone(),
            &request.title,
            &request.body,
            request.source.as_deref(),
            request.url.as_deref(),
            image_url,
            &ai,
        )?;

        if let Err(e) = self.storage.insert_new(&article).await {
            if article.image.is_some() {
                warn!("Leaving uploaded image {} without a stored article", image_key(&fingerprint));
            }
            return Err(e.into());
        }

        info!("✨ Stored article {}", fingerprint);
        Ok(IngestOutcome::Created { fingerprint, ai })
    }
}
