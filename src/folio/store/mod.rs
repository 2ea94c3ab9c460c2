//! Document store abstraction.
//!
//! Handlers only need a handful of operations: equality-filtered listing,
//! lookup by id and insertion. Documents are JSON objects; the store assigns
//! the identifier and exposes it as `_id` when a document is serialized.

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;

use async_trait::async_trait;
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};
use thiserror::Error;
use uuid::Uuid;

/// Field name used to expose a document id to clients.
pub const ID_FIELD: &str = "_id";

/// Shared handle passed to every handler.
pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("store is closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Projects,
    Skills,
    Blogs,
}

impl Collection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Blogs => "blogs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on top-level document fields. An empty filter matches all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Add an equality constraint only when a value is present.
    #[must_use]
    pub fn eq_opt(self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| fields.get(field) == Some(expected))
    }

    #[must_use]
    pub fn as_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// A stored document: its id plus the client supplied fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub fields: Map<String, Value>,
}

impl Document {
    #[must_use]
    pub fn new(id: Uuid, mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in `collection` matching `filter`, oldest first.
    async fn find(&self, collection: Collection, filter: &Filter)
        -> Result<Vec<Document>, StoreError>;

    /// Return the first document matching `filter`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a new document and return the id assigned to it.
    /// A client supplied `_id` is discarded.
    async fn insert(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<Uuid, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release backend resources; called once after the server stopped.
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn filter_matches_equal_fields_only() {
        let filter = Filter::new().eq("category", "web");
        assert!(filter.matches(&fields(json!({"category": "web", "name": "a"}))));
        assert!(!filter.matches(&fields(json!({"category": "Web"}))));
        assert!(!filter.matches(&fields(json!({"name": "a"}))));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::new().eq_opt("category", None::<String>);
        assert!(filter.is_empty());
        assert!(filter.matches(&Map::new()));
    }

    #[test]
    fn document_serializes_with_id() -> Result<(), serde_json::Error> {
        let id = Uuid::now_v7();
        let doc = Document::new(id, fields(json!({"_id": "client", "title": "hello"})));
        let value = serde_json::to_value(&doc)?;
        assert_eq!(value, json!({"_id": id.to_string(), "title": "hello"}));
        Ok(())
    }

    #[test]
    fn collection_names() {
        assert_eq!(Collection::Users.to_string(), "users");
        assert_eq!(Collection::Blogs.as_str(), "blogs");
    }
}
