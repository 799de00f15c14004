use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{document_id, Document, DocumentStore, FindOptions, SortDirection, StoreError};

/// Process-local document store.
///
/// Each collection sits behind its own map shard lock, which makes every
/// operation atomic per document. Used for tests and `memory://` deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, HashMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let id = document_id(&document)
            .ok_or_else(|| StoreError::Corrupt("document has no string id".into()))?
            .to_owned();
        let mut docs = self.collections.entry(collection.to_owned()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        docs.insert(id, document);
        Ok(())
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let mut found: Vec<Document> = match self.collections.get(collection) {
            Some(docs) => docs.values().cloned().collect(),
            None => return Ok(Vec::new()),
        };
        if let Some(sort) = options.sort {
            found.sort_by(|a, b| {
                let ordering = compare_values(a.get(sort.field), b.get(sort.field));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        found.truncate(options.limit);
        Ok(found)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<u64, StoreError> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.get_mut(id) {
            Some(document) => {
                for (field, value) in fields {
                    document.insert(field, value);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let removed = self
            .collections
            .get_mut(collection)
            .and_then(|mut docs| docs.remove(id));
        Ok(u64::from(removed.is_some()))
    }
}

// Missing and null sort first, then booleans, numbers, strings.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
