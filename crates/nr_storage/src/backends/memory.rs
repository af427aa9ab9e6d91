use async_trait::async_trait;
use nr_core::{Article, ArticleStorage, Error, ImageStorage, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Articles in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.articles.iter().any(|a| a.fingerprint == fingerprint)
    }

    pub fn insert_new(&mut self, article: &Article) -> Result<()> {
        if self.contains(&article.fingerprint) {
            return Err(Error::Conflict(article.fingerprint.clone()));
        }
        self.articles.push(article.clone());
        Ok(())
    }

    pub fn scan(&self, limit: usize) -> Vec<Article> {
        self.articles.iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn get(&self, fingerprint: &str) -> Option<Article> {
        let store = self.store.read().await;
        store.articles.iter().find(|a| a.fingerprint == fingerprint).cloned()
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn exists(&self, fingerprint: &str) -> Result<bool> {
        let store = self.store.read().await;
        Ok(store.contains(fingerprint))
    }

    async fn insert_new(&self, article: &Article) -> Result<()> {
        let mut store = self.store.write().await;
        store.insert_new(article)
    }

    async fn scan(&self, limit: usize) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.scan(limit))
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Clone, Default)]
pub struct InMemoryImageStorage {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl InMemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn put_image(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let mut objects = self.objects.write().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_core::AiEnrichment;

    fn article(title: &str) -> Article {
        Article::new(
            nr_core::fingerprint(title, "body"),
            title,
            "body",
            Some("test"),
            None,
            None,
            &AiEnrichment::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = InMemoryStorage::new();
        let first = article("First");

        assert!(!storage.exists(&first.fingerprint).await.unwrap());
        storage.insert_new(&first).await.unwrap();
        assert!(storage.exists(&first.fingerprint).await.unwrap());
        assert_eq!(storage.get(&first.fingerprint).await, Some(first.clone()));
    }

    #[tokio::test]
    async fn test_insert_is_conditional() {
        let storage = InMemoryStorage::new();
        let first = article("First");
        storage.insert_new(&first).await.unwrap();

        let err = storage.insert_new(&first).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(fp) if fp == first.fingerprint));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_scan_keeps_order_and_limit() {
        let storage = InMemoryStorage::new();
        for title in ["a", "b", "c"] {
            storage.insert_new(&article(title)).await.unwrap();
        }

        let titles: Vec<_> = storage
            .scan(2)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_image_storage() {
        let images = InMemoryImageStorage::new();
        let url = images
            .put_image("articles/fp/image.jpg", vec![0xff, 0xd8], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "memory://articles/fp/image.jpg");

        let object = images.get("articles/fp/image.jpg").await.unwrap();
        assert_eq!(object.bytes, vec![0xff, 0xd8]);
        assert_eq!(object.content_type, "image/jpeg");
    }
}
