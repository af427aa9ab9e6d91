use async_trait::async_trait;
use nr_core::{Article, ArticleStorage, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        fingerprint TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        source TEXT NOT NULL,
        url TEXT NOT NULL,
        image TEXT,
        ai TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
];

/// Local stand-in for the DynamoDB table.
pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create database directory: {}", e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn exists(&self, fingerprint: &str) -> Result<bool> {
        let row = sqlx::query("SELECT fingerprint FROM articles WHERE fingerprint = ?")
            .bind(fingerprint)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to look up {}: {}", fingerprint, e)))?;

        Ok(row.is_some())
    }

    async fn insert_new(&self, article: &Article) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO articles
            (fingerprint, title, body, source, url, image, ai, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.fingerprint)
        .bind(&article.title)
        .bind(&article.body)
        .bind(&article.source)
        .bind(&article.url)
        .bind(article.image.as_deref())
        .bind(&article.ai)
        .bind(article.created_at_iso())
        .execute(&*self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(Error::Conflict(article.fingerprint.clone()))
            }
            Err(e) => Err(Error::Storage(format!(
                "Failed to store article {}: {}",
                article.fingerprint, e
            ))),
        }
    }

    async fn scan(&self, limit: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT fingerprint, title, body, source, url, image, ai, created_at
            FROM articles
            LIMIT ?
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to scan articles: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let created_at: String = row.get("created_at");
                Article {
                    fingerprint: row.get("fingerprint"),
                    title: row.get("title"),
                    body: row.get("body"),
                    source: row.get("source"),
                    url: row.get("url"),
                    image: row.get("image"),
                    ai: row.get("ai"),
                    created_at: Article::parse_created_at(&created_at),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_core::AiEnrichment;
    use tempfile::tempdir;

    fn article(title: &str, image: Option<&str>) -> Article {
        Article::new(
            nr_core::fingerprint(title, "body"),
            title,
            "body",
            Some("test"),
            None,
            image.map(str::to_string),
            &AiEnrichment::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_storage() {
        let dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&dir.path().join("articles.db"))
            .await
            .unwrap();

        let first = article("First", None);
        let second = article("Second", Some("memory://articles/x/image.jpg"));
        assert!(!storage.exists(&first.fingerprint).await.unwrap());

        storage.insert_new(&first).await.unwrap();
        storage.insert_new(&second).await.unwrap();
        assert!(storage.exists(&first.fingerprint).await.unwrap());

        let scanned = storage.scan(10).await.unwrap();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].title, "First");
        assert_eq!(scanned[0].image, None);
        assert_eq!(scanned[1].image.as_deref(), Some("memory://articles/x/image.jpg"));
        assert_eq!(storage.scan(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_conditional_insert() {
        let dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&dir.path().join("nested/articles.db"))
            .await
            .unwrap();

        let first = article("First", None);
        storage.insert_new(&first).await.unwrap();
        assert!(matches!(
            storage.insert_new(&first).await,
            Err(Error::Conflict(_))
        ));
    }
}
