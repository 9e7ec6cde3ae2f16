//! In-process document store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Document, DocumentStore, Filter, RangeQuery, StoreError};

// == Memory Store ==

type Collection = BTreeMap<String, Map<String, Value>>;

/// Document store held entirely in memory, keyed by collection then id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn matches_all(filters: &[Filter], fields: &Map<String, Value>) -> bool {
    filters.iter().all(|filter| filter.matches(fields))
}

// == DocumentStore Implementation ==

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn put(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(document.id, document.fields);
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filters: &[Filter],
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, fields)| matches_all(filters, fields))
            .take(limit)
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn range_query(
        &self,
        collection: &str,
        query: &RangeQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<(&str, &String, &Map<String, Value>)> = docs
            .iter()
            .filter_map(|(id, fields)| {
                let key = fields.get(&query.order_by)?.as_str()?;
                let in_range = key >= query.start.as_str() && key <= query.end.as_str();
                (in_range && matches_all(&query.filters, fields)).then_some((key, id, fields))
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.cmp(b.1)));

        Ok(hits
            .into_iter()
            .take(query.limit)
            .map(|(_, id, fields)| Document::new(id.clone(), fields.clone()))
            .collect())
    }
}
