use nr_core::{ArticleStorage, DisplayArticle, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use crate::response::HandlerResponse;

/// Upper bound of a single listing. There is no continuation; records past
/// this bound are not listed.
pub const SCAN_LIMIT: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleListing {
    pub articles: Vec<DisplayArticle>,
}

pub struct ListingWorkflow {
    storage: Arc<dyn ArticleStorage>,
}

impl ListingWorkflow {
    pub fn new(storage: Arc<dyn ArticleStorage>) -> Self {
        Self { storage }
    }

    /// Articles in store order, projected for display.
    pub async fn list(&self) -> Result<ArticleListing> {
        let stored = self.storage.scan(SCAN_LIMIT).await?;
        debug!("Listing {} stored articles", stored.len());

        Ok(ArticleListing {
            articles: stored.iter().take(SCAN_LIMIT).map(DisplayArticle::from).collect(),
        })
    }

    pub async fn handle(&self) -> HandlerResponse {
        let listing = match self.list().await {
            Ok(listing) => listing,
            Err(e) => {
                error!("❌ Newsroom listing error: {}", e);
                return HandlerResponse::internal_error();
            }
        };

        match serde_json::to_value(&listing) {
            Ok(body) => HandlerResponse::json(200, body),
            Err(e) => {
                error!("❌ Failed to serialize listing: {}", e);
                HandlerResponse::internal_error()
            }
        }
    }
}
