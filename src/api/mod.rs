//! API Module
//!
//! HTTP handlers and routing for the PRO directory REST API.
//!
//! # Endpoints
//! - `/api/pros` - PRO listing and writes
//! - `/api/internal/*` - Cache operations and health
//! - `/health` - Health check endpoint

pub mod conditional;
pub mod handlers;
pub mod internal;
pub mod routes;

pub use handlers::*;
pub use internal::*;
pub use routes::create_router;
