//! In-process store backed by a `RwLock`. Used by tests and `--dsn memory://`.

use super::{Collection, Document, DocumentStore, Filter, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|docs| {
            docs.iter()
                .find(|doc| filter.matches(&doc.fields))
                .cloned()
        }))
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::now_v7();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .push(Document::new(id, fields));
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
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

    #[tokio::test]
    async fn insert_then_find_in_order() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        let first = store
            .insert(Collection::Projects, fields(json!({"name": "a", "category": "web"})))
            .await?;
        let second = store
            .insert(Collection::Projects, fields(json!({"name": "b", "category": "cli"})))
            .await?;

        let all = store.find(Collection::Projects, &Filter::new()).await?;
        assert_eq!(
            all.iter().map(|doc| doc.id).collect::<Vec<_>>(),
            vec![first, second]
        );

        let web = store
            .find(Collection::Projects, &Filter::new().eq("category", "web"))
            .await?;
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].get_str("name"), Some("a"));
        Ok(())
    }

    #[tokio::test]
    async fn collections_are_isolated() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Blogs, fields(json!({"title": "post"})))
            .await?;

        assert!(store.find_by_id(Collection::Blogs, id).await?.is_some());
        assert!(store.find_by_id(Collection::Skills, id).await?.is_none());
        assert!(store.find(Collection::Skills, &Filter::new()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn find_one_returns_first_match() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        store
            .insert(Collection::Users, fields(json!({"email": "a@b.c", "role": "admin"})))
            .await?;

        let found = store
            .find_one(Collection::Users, &Filter::new().eq("email", "a@b.c"))
            .await?;
        assert_eq!(
            found.and_then(|doc| doc.get_str("role").map(str::to_string)),
            Some("admin".to_string())
        );

        let missing = store
            .find_one(Collection::Users, &Filter::new().eq("email", "A@b.c"))
            .await?;
        assert!(missing.is_none());
        Ok(())
    }
}
