use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use nr_core::{Article, ArticleStorage, Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Item = HashMap<String, AttributeValue>;

pub struct DynamoDbStorage {
    client: Arc<Client>,
    table: String,
}

impl DynamoDbStorage {
    pub async fn new(table: &str, region: &str) -> Self {
        let config = nr_core::aws::load_sdk_config(region).await;
        Self::with_client(Client::new(&config), table)
    }

    pub fn with_client(client: Client, table: &str) -> Self {
        Self {
            client: Arc::new(client),
            table: table.to_string(),
        }
    }
}

impl fmt::Debug for DynamoDbStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDbStorage")
            .field("client", &"<aws_sdk_dynamodb::Client>")
            .field("table", &self.table)
            .finish()
    }
}

pub fn article_to_item(article: &Article) -> Item {
    let mut item = HashMap::new();
    item.insert("fingerprint".to_string(), AttributeValue::S(article.fingerprint.clone()));
    item.insert("title".to_string(), AttributeValue::S(article.title.clone()));
    item.insert("body".to_string(), AttributeValue::S(article.body.clone()));
    item.insert("source".to_string(), AttributeValue::S(article.source.clone()));
    item.insert("url".to_string(), AttributeValue::S(article.url.clone()));
    item.insert(
        "image".to_string(),
        match &article.image {
            Some(url) => AttributeValue::S(url.clone()),
            None => AttributeValue::Null(true),
        },
    );
    item.insert("ai".to_string(), AttributeValue::S(article.ai.clone()));
    item.insert("createdAt".to_string(), AttributeValue::S(article.created_at_iso()));
    item
}

fn string_attr(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

/// Lenient read: missing or non-string attributes become empty values.
pub fn item_to_article(item: &Item) -> Article {
    Article {
        fingerprint: string_attr(item, "fingerprint").unwrap_or_default(),
        title: string_attr(item, "title").unwrap_or_default(),
        body: string_attr(item, "body").unwrap_or_default(),
        source: string_attr(item, "source").unwrap_or_default(),
        url: string_attr(item, "url").unwrap_or_default(),
        image: string_attr(item, "image"),
        ai: string_attr(item, "ai").unwrap_or_default(),
        created_at: Article::parse_created_at(&string_attr(item, "createdAt").unwrap_or_default()),
    }
}

#[async_trait]
impl ArticleStorage for DynamoDbStorage {
    async fn exists(&self, fingerprint: &str) -> Result<bool> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("fingerprint", AttributeValue::S(fingerprint.to_string()))
            .projection_expression("fingerprint")
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to look up {}: {}", fingerprint, e)))?;

        Ok(output.item().is_some())
    }

    async fn insert_new(&self, article: &Article) -> Result<()> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(article_to_item(article)))
            .condition_expression("attribute_not_exists(fingerprint)")
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!("Stored article {}", article.fingerprint);
                Ok(())
            }
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                Err(Error::Conflict(article.fingerprint.clone()))
            }
            Err(e) => Err(Error::Storage(format!(
                "Failed to store article {}: {}",
                article.fingerprint, e
            ))),
        }
    }

    async fn scan(&self, limit: usize) -> Result<Vec<Article>> {
        let output = self
            .client
            .scan()
            .table_name(&self.table)
            .limit(i32::try_from(limit).unwrap_or(i32::MAX))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to scan articles: {}", e)))?;

        Ok(output.items().iter().map(item_to_article).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_core::AiEnrichment;

    #[test]
    fn test_item_layout() {
        let article = Article::new(
            "abc".to_string(),
            "Title",
            "Body",
            None,
            Some("https://example.com/a"),
            None,
            &AiEnrichment::Raw { raw: "x".to_string() },
        )
        .unwrap();

        let item = article_to_item(&article);
        assert_eq!(item.get("fingerprint"), Some(&AttributeValue::S("abc".to_string())));
        assert_eq!(item.get("source"), Some(&AttributeValue::S("unknown".to_string())));
        assert_eq!(item.get("image"), Some(&AttributeValue::Null(true)));
        assert_eq!(item.get("ai"), Some(&AttributeValue::S(r#"{"raw":"x"}"#.to_string())));
        assert!(item.contains_key("createdAt"));
    }

    #[test]
    fn test_item_round_trip() {
        let mut article = Article::new(
            "abc".to_string(),
            "Title",
            "Body",
            Some("wire"),
            None,
            Some("https://bucket.s3.us-east-1.amazonaws.com/articles/abc/image.jpg".to_string()),
            &AiEnrichment::default(),
        )
        .unwrap();
        article.created_at = Article::parse_created_at(&article.created_at_iso());

        assert_eq!(item_to_article(&article_to_item(&article)), article);
    }

    #[test]
    fn test_sparse_item_is_read_leniently() {
        let mut item = HashMap::new();
        item.insert("fingerprint".to_string(), AttributeValue::S("abc".to_string()));
        item.insert("image".to_string(), AttributeValue::Null(true));

        let article = item_to_article(&item);
        assert_eq!(article.fingerprint, "abc");
        assert_eq!(article.title, "");
        assert_eq!(article.image, None);
        assert_eq!(article.ai, "");
    }
}
