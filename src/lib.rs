//! PRO Directory - pet-care professional listing service
//!
//! Serves PRO listings through an ETag-aware TTL cache, backed by a
//! geohash radius search over a document store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod pros;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use store::{DocumentStore, MemoryStore};
pub use tasks::spawn_sweep_task;
