use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Key-only lookup used for dedupe checks
    async fn exists(&self, fingerprint: &str) -> Result<bool>;

    /// Conditional insert. Fails with `Error::Conflict` if the fingerprint is already stored.
    async fn insert_new(&self, article: &Article) -> Result<()>;

    /// Up to `limit` articles in store order
    async fn scan(&self, limit: usize) -> Result<Vec<Article>>;
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store an object and return its public URL
    async fn put_image(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;
}

pub fn image_key(fingerprint: &str) -> String {
    format!("articles/{}/image.jpg", fingerprint)
}
