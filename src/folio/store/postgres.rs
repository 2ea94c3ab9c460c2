//! Postgres backed store: one `documents` table holding `jsonb` documents.

use super::{Collection, Document, DocumentStore, Filter, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{Connection, PgPool, postgres::PgPoolOptions, types::Json};
use std::time::Duration;
use tracing::{Instrument, debug, info_span, instrument};
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database and make sure the schema exists.
    ///
    /// # Errors
    /// Returns an error if the connection or the schema statements fail.
    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await?;

        let store = Self { pool };
        store.apply_schema().await?;

        Ok(store)
    }

    async fn apply_schema(&self) -> Result<(), StoreError> {
        for statement in split_sql_statements(SCHEMA_SQL) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        debug!("schema applied");
        Ok(())
    }
}

fn into_document((id, Json(doc)): (Uuid, Json<Value>)) -> Result<Document, StoreError> {
    match doc {
        Value::Object(fields) => Ok(Document::new(id, fields)),
        other => Err(StoreError::InvalidDocument(format!(
            "document {id} is not an object: {other}"
        ))),
    }
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

#[async_trait]
impl DocumentStore for PgStore {
    #[instrument(skip(self))]
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        let rows: Vec<(Uuid, Json<Value>)> = sqlx::query_as(
            "SELECT id, doc FROM documents WHERE collection = $1 AND doc @> $2 ORDER BY id",
        )
        .bind(collection.as_str())
        .bind(Json(filter.as_json()))
        .fetch_all(&self.pool)
        .instrument(span)
        .await?;

        rows.into_iter().map(into_document).collect()
    }

    #[instrument(skip(self))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        let row: Option<(Uuid, Json<Value>)> = sqlx::query_as(
            "SELECT id, doc FROM documents WHERE collection = $1 AND doc @> $2 ORDER BY id LIMIT 1",
        )
        .bind(collection.as_str())
        .bind(Json(filter.as_json()))
        .fetch_optional(&self.pool)
        .instrument(span)
        .await?;

        row.map(into_document).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        let row: Option<(Uuid, Json<Value>)> =
            sqlx::query_as("SELECT id, doc FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .instrument(span)
                .await?;

        row.map(into_document).transpose()
    }

    #[instrument(skip(self, fields))]
    async fn insert(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<Uuid, StoreError> {
        let document = Document::new(Uuid::now_v7(), fields);
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "INSERT");
        sqlx::query("INSERT INTO documents (id, collection, doc) VALUES ($1, $2, $3)")
            .bind(document.id)
            .bind(collection.as_str())
            .bind(Json(Value::Object(document.fields)))
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(document.id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::Closed);
        }
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;
        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_splits_into_statements() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS documents"));
        assert!(statements.iter().all(|s| !s.contains("--")));
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let id = Uuid::now_v7();
        let result = into_document((id, Json(Value::String("oops".to_string()))));
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }
}
