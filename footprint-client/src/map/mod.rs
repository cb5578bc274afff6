//! Map rendering layer
//!
//! The concrete map SDK sits behind [`MapProvider`]; geocoding and keyword
//! search sit behind [`Geocoder`] and [`PlaceSearch`]. [`MapRenderer`] turns
//! the location list into markers, date lines and popups through those
//! traits and publishes user interaction on a [`MapEventBus`].

use async_trait::async_trait;
use footprint_common::LatLng;
use serde::{Deserialize, Serialize};

use crate::error::MapError;

pub mod events;
pub mod headless;
pub mod info;
pub mod palette;
pub mod renderer;

pub use events::{MapEvent, MapEventBus};
pub use headless::HeadlessMap;
pub use info::InfoContent;
pub use palette::{LineStyle, MarkerStyle};
pub use renderer::{MapRenderer, MarkerEffect};

/// Zoom level used when centering on a search result
pub const SEARCH_ZOOM: u8 = 3;

/// Handle to a marker owned by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Handle to a polyline owned by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

/// Handle to an open info popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InfoId(pub u64);

/// Drawing primitives of a map widget
///
/// Removal of an unknown handle is a no-op so clearing never fails halfway.
pub trait MapProvider: Send {
    fn add_marker(&mut self, position: LatLng, style: &MarkerStyle) -> Result<MarkerId, MapError>;

    fn remove_marker(&mut self, id: MarkerId);

    fn add_polyline(&mut self, path: &[LatLng], style: &LineStyle) -> Result<LineId, MapError>;

    fn set_polyline_style(&mut self, id: LineId, style: &LineStyle) -> Result<(), MapError>;

    fn remove_polyline(&mut self, id: LineId);

    fn open_info(&mut self, anchor: LatLng, content: &InfoContent) -> Result<InfoId, MapError>;

    fn close_info(&mut self, id: InfoId);

    fn set_center(&mut self, position: LatLng, zoom: Option<u8>) -> Result<(), MapError>;
}

/// Address ⇄ coordinate lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the address matches nothing
    async fn geocode(&self, address: &str) -> Result<Option<LatLng>, MapError>;

    /// Road address when known, otherwise the lot address
    async fn reverse_geocode(&self, position: LatLng) -> Result<Option<String>, MapError>;
}

/// Keyword place search
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<PlaceResult>, MapError>;
}

/// One keyword search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: String,
    pub name: String,
    pub address: String,
    pub road_address: Option<String>,
    pub phone: Option<String>,
    /// Provider category path, e.g. "음식점 > 카페"
    pub category_name: String,
    pub position: LatLng,
}

impl PlaceResult {
    pub fn display_address(&self) -> &str {
        self.road_address
            .as_deref()
            .filter(|road| !road.is_empty())
            .unwrap_or(&self.address)
    }
}
