use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, instrument};

use super::{document_id, Document, DocumentStore, FindOptions, SortDirection, StoreError};
use crate::config::DatabaseConfig;

const MAX_BACKOFF: Duration = Duration::from_millis(500);

/// Document store on a pooled SQLite database.
///
/// All collections share one `documents(collection, id, body)` table; the
/// body is the JSON text of the document.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    timeout: Duration,
    retry_attempts: usize,
    retry_base_ms: u64,
}

impl SqliteStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(timeout)
            .connect(&config.url)
            .await?;
        Ok(Self {
            pool,
            timeout,
            retry_attempts: config.retry_attempts,
            retry_base_ms: config.retry_base_ms.max(1),
        })
    }

    /// Create the documents table if it does not exist yet.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))
    }

    /// Run one store call under the per-call timeout, retrying transient
    /// failures with jittered exponential backoff.
    async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let limit = self.timeout;
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.retry_base_ms)
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(self.retry_attempts);

        RetryIf::start(
            strategy,
            || {
                let pending = call();
                async move {
                    match tokio::time::timeout(limit, pending).await {
                        Ok(result) => result.map_err(StoreError::from),
                        Err(_) => Err(StoreError::Timeout(limit)),
                    }
                }
            },
            StoreError::is_transient,
        )
        .await
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    #[instrument(skip(self, document))]
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let id = document_id(&document)
            .ok_or_else(|| StoreError::Corrupt("document has no string id".into()))?
            .to_owned();
        let body = serde_json::to_string(&document).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        self.run(|| {
            sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
                .bind(collection)
                .bind(id.as_str())
                .bind(body.as_str())
                .execute(&self.pool)
        })
        .await
        .map_err(|err| match err {
            StoreError::DuplicateId(_) => StoreError::DuplicateId(id.clone()),
            other => other,
        })?;
        debug!(%id, "document inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = self
            .run(|| {
                sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
                    .bind(collection)
                    .bind(id)
                    .fetch_optional(&self.pool)
            })
            .await?;

        row.map(|row| parse_body(&row)).transpose()
    }

    #[instrument(skip(self))]
    async fn find_many(
        &self,
        collection: &str,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let sort_path = options.sort.map(|sort| format!("$.{}", sort.field));
        let order_clause = match options.sort.map(|sort| sort.direction) {
            Some(SortDirection::Ascending) => " ORDER BY json_extract(body, ?) ASC",
            Some(SortDirection::Descending) => " ORDER BY json_extract(body, ?) DESC",
            None => "",
        };
        let sql = format!("SELECT body FROM documents WHERE collection = ?{order_clause} LIMIT ?");
        let limit = i64::try_from(options.limit).unwrap_or(i64::MAX);

        let rows = self
            .run(|| {
                let mut query = sqlx::query(&sql).bind(collection);
                if let Some(path) = &sort_path {
                    query = query.bind(path.as_str());
                }
                query.bind(limit).fetch_all(&self.pool)
            })
            .await?;

        rows.iter().map(parse_body).collect()
    }

    #[instrument(skip(self, fields))]
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<u64, StoreError> {
        let patch = serde_json::to_string(&fields).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        // json_patch merges nested objects recursively (RFC 7396).
        let result = self
            .run(|| {
                sqlx::query(
                    "UPDATE documents SET body = json_patch(body, ?) WHERE collection = ? AND id = ?",
                )
                .bind(patch.as_str())
                .bind(collection)
                .bind(id)
                .execute(&self.pool)
            })
            .await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let result = self
            .run(|| {
                sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
                    .bind(collection)
                    .bind(id)
                    .execute(&self.pool)
            })
            .await?;
        Ok(result.rows_affected())
    }
}

fn parse_body(row: &sqlx::sqlite::SqliteRow) -> Result<Document, StoreError> {
    let body: String = row.try_get("body")?;
    serde_json::from_str(&body).map_err(|err| StoreError::Corrupt(format!("unreadable document body: {err}")))
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::DuplicateId(db.message().to_owned())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => StoreError::Corrupt(err.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
