pub mod aws;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod storage;
pub mod types;

pub use error::Error;
pub use fingerprint::fingerprint;
pub use models::InferenceModel;
pub use storage::{ArticleStorage, ImageStorage};
pub use types::{AiEnrichment, AiSummary, Article, DisplayArticle};

pub type Result<T> = std::result::Result<T, Error>;
