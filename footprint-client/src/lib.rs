//! footprint-client - couple footprint map client logic
//!
//! Everything the map front end needs that is not drawing pixels:
//! - Filter engine, date grouping and statistics over the location list
//! - Reducer-style client state
//! - Provider-agnostic map rendering (markers, date lines, popups, search pin)
//! - Debounced place search
//! - HTTP API client for footprint-server
//! - Local cache, periodic auto-save and one-time migration of cached records

pub mod api_client;
pub mod app;
pub mod cache;
pub mod draft;
pub mod error;
pub mod filter;
pub mod map;
pub mod migration;
pub mod search;
pub mod state;

pub use api_client::{FootprintApi, FootprintClient};
pub use app::{FootprintApp, Notice, NoticeLevel};
pub use draft::RegistrationDraft;
pub use error::{ClientError, MapError};
pub use state::{Action, ClientState, FilterChip, View};
