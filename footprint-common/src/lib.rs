//! # Footprint Common Library
//!
//! Shared code for the couple footprint map server and client:
//! - Record models and wire DTOs (couples, locations, categories)
//! - Couple code generation and parsing
//! - Configuration loading and root folder resolution
//! - Common error type
//! - Timestamp helpers

pub mod code;
pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use code::CoupleCode;
pub use error::{Error, Result};
pub use models::{Category, Couple, LatLng, Location, NewLocation};
