//! Client error types

use thiserror::Error;

/// Errors talking to footprint-server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    /// Unknown couple code
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server answered with a non-success status
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or invalid form input, caught before any request is sent
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cache error: {0}")]
    Cache(#[from] footprint_common::Error),
}

/// Errors from the map, geocoding or places provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("Map provider unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown map object: {0}")]
    UnknownObject(String),

    #[error("Geocoding failed: {0}")]
    Geocoding(String),

    #[error("Place search failed: {0}")]
    Search(String),

    /// Decorative effect failed; never propagated past the renderer
    #[error("Effect failed: {0}")]
    Effect(String),
}
