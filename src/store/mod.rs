//! Document Store Module
//!
//! The persistence boundary the listing service depends on: single-document
//! reads and writes, equality/array-contains filtered queries and ordered
//! range queries over a string field.

mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;

// == Store Error ==
/// Failures surfaced by a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation
    #[error("store backend error: {0}")]
    Backend(String),

    /// A document could not be converted to or from its typed form
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Document ==
/// A stored document: its identity plus an untyped field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

// == Filter ==
/// A predicate applied verbatim by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field == value`
    Eq { field: String, value: Value },
    /// `field` is an array holding `value`
    ArrayContains { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::ArrayContains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluates the predicate against a field map.
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        match self {
            Filter::Eq { field, value } => fields.get(field) == Some(value),
            Filter::ArrayContains { field, value } => fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}

// == Range Query ==
/// Documents whose `order_by` string field lies in `[start, end]`, ordered
/// by that field, filtered and capped at `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub order_by: String,
    pub start: String,
    pub end: String,
    pub filters: Vec<Filter>,
    pub limit: usize,
}

// == Document Store ==
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Creates or fully replaces a document.
    async fn put(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Documents matching every filter, ordered by id, at most `limit`.
    async fn find(
        &self,
        collection: &str,
        filters: &[Filter],
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Ordered, inclusive range query over a string field.
    async fn range_query(
        &self,
        collection: &str,
        query: &RangeQuery,
    ) -> Result<Vec<Document>, StoreError>;
}
