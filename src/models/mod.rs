//! Request and Response models for the astrology API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CalculateRequest, GeocodeQuery, InterpretRequest, InvalidateRequest, TransitRequest};
pub use responses::{
    ClearResponse, DeleteResponse, HealthResponse, InterpretResponse, InvalidateResponse,
    StatsResponse, TransitResponse,
};
