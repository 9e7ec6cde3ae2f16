//! Request and Response models for the PRO directory API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateProRequest, InvalidateParams, ListProsQuery, UpdateProRequest};
pub use responses::{
    CacheStatsResponse, DeleteResponse, ErrorResponse, HealthResponse, InvalidateResponse,
    ListingResponse, ProResponse, SweepResponse,
};
