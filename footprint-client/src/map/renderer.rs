//! Provider-agnostic renderer
//!
//! Owns the handles it created on the provider, so every render call starts
//! by removing what the previous one drew.

use std::collections::HashMap;

use chrono::NaiveDate;
use footprint_common::{LatLng, Location};
use tracing::{debug, info, warn};

use super::events::{MapEvent, MapEventBus};
use super::info::{self, InfoContent};
use super::palette;
use super::{Geocoder, InfoId, LineId, MapProvider, MarkerId, PlaceResult, SEARCH_ZOOM};
use crate::draft::RegistrationDraft;
use crate::error::MapError;
use crate::filter;

/// Decorative effect played when a marker is clicked
pub trait MarkerEffect: Send + Sync {
    fn play(&self, location: &Location) -> Result<(), MapError>;
}

struct MarkerEntry {
    location: Location,
    info: InfoContent,
}

struct LineEntry {
    date: NaiveDate,
    day_of_week: usize,
    info: InfoContent,
    hover_info: Option<InfoId>,
}

struct TempMarker {
    marker: MarkerId,
    info: Option<InfoId>,
}

pub struct MapRenderer<M: MapProvider> {
    map: M,
    events: MapEventBus,
    effect: Option<Box<dyn MarkerEffect>>,
    markers: HashMap<MarkerId, MarkerEntry>,
    open_marker_info: Option<InfoId>,
    lines: HashMap<LineId, LineEntry>,
    temp: Option<TempMarker>,
}

impl<M: MapProvider> MapRenderer<M> {
    pub fn new(map: M, events: MapEventBus) -> Self {
        Self {
            map,
            events,
            effect: None,
            markers: HashMap::new(),
            open_marker_info: None,
            lines: HashMap::new(),
            temp: None,
        }
    }

    pub fn with_effect(mut self, effect: Box<dyn MarkerEffect>) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn events(&self) -> &MapEventBus {
        &self.events
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Marker currently drawn for a location id
    pub fn marker_for(&self, location_id: i64) -> Option<MarkerId> {
        self.markers
            .iter()
            .find(|(_, entry)| entry.location.id == location_id)
            .map(|(id, _)| *id)
    }

    /// Line currently drawn for a date
    pub fn line_for(&self, date: NaiveDate) -> Option<LineId> {
        self.lines
            .iter()
            .find(|(_, entry)| entry.date == date)
            .map(|(id, _)| *id)
    }

    pub fn clear_markers(&mut self) {
        self.close_marker_info();
        for (id, _) in self.markers.drain() {
            self.map.remove_marker(id);
        }
    }

    /// Replace all markers with one per location
    pub fn render_markers<'a, I>(&mut self, locations: I) -> Result<usize, MapError>
    where
        I: IntoIterator<Item = &'a Location>,
    {
        self.clear_markers();

        for location in locations {
            let style = palette::marker_style(location.category);
            let id = self.map.add_marker(location.position(), &style)?;
            self.markers.insert(
                id,
                MarkerEntry {
                    location: location.clone(),
                    info: info::marker_info(location),
                },
            );
        }

        debug!("Rendered {} markers", self.markers.len());
        Ok(self.markers.len())
    }

    pub fn clear_lines(&mut self) {
        for (id, entry) in self.lines.drain() {
            if let Some(info) = entry.hover_info {
                self.map.close_info(info);
            }
            self.map.remove_polyline(id);
        }
    }

    /// Replace all date lines: one path per date with two or more visits,
    /// ordered by time of day and colored by weekday
    pub fn render_date_lines<'a, I>(&mut self, locations: I) -> Result<usize, MapError>
    where
        I: IntoIterator<Item = &'a Location>,
    {
        self.clear_lines();

        for group in filter::group_by_date(locations) {
            if group.len() < 2 {
                continue;
            }

            let ordered = group.by_time_of_day();
            let path: Vec<LatLng> = ordered.iter().map(|location| location.position()).collect();
            let day_of_week = group.day_of_week();

            let id = self
                .map
                .add_polyline(&path, &palette::line_style(day_of_week))?;
            self.lines.insert(
                id,
                LineEntry {
                    date: group.date,
                    day_of_week,
                    info: info::itinerary_info(group.date, day_of_week, &ordered),
                    hover_info: None,
                },
            );
        }

        debug!("Rendered {} date lines", self.lines.len());
        Ok(self.lines.len())
    }

    /// Marker click: close other popups, open this one, play the effect
    pub fn handle_marker_click(&mut self, id: MarkerId) -> Result<(), MapError> {
        let (position, content, location) = match self.markers.get(&id) {
            Some(entry) => (
                entry.location.position(),
                entry.info.clone(),
                entry.location.clone(),
            ),
            None => return Err(MapError::UnknownObject(format!("marker {}", id.0))),
        };

        self.close_marker_info();
        self.open_marker_info = Some(self.map.open_info(position, &content)?);

        if let Some(effect) = &self.effect {
            if let Err(e) = effect.play(&location) {
                warn!("Marker effect failed for {}: {}", location.name, e);
            }
        }

        self.events.emit(MapEvent::MarkerSelected(location));
        Ok(())
    }

    /// Line hover: emphasize and show the itinerary at the pointer
    pub fn handle_line_hover(&mut self, id: LineId, at: LatLng) -> Result<(), MapError> {
        let entry = self
            .lines
            .get_mut(&id)
            .ok_or_else(|| MapError::UnknownObject(format!("line {}", id.0)))?;

        self.map
            .set_polyline_style(id, &palette::line_hover_style(entry.day_of_week))?;
        if let Some(previous) = entry.hover_info.take() {
            self.map.close_info(previous);
        }
        entry.hover_info = Some(self.map.open_info(at, &entry.info)?);

        self.events.emit(MapEvent::LineHovered { date: entry.date });
        Ok(())
    }

    /// Line unhover: restore the base stroke and close the itinerary
    pub fn handle_line_unhover(&mut self, id: LineId) -> Result<(), MapError> {
        let entry = self
            .lines
            .get_mut(&id)
            .ok_or_else(|| MapError::UnknownObject(format!("line {}", id.0)))?;

        if let Some(info) = entry.hover_info.take() {
            self.map.close_info(info);
        }
        self.map
            .set_polyline_style(id, &palette::line_style(entry.day_of_week))?;

        self.events.emit(MapEvent::LineUnhovered { date: entry.date });
        Ok(())
    }

    /// Focus a search result with a temporary pin; the location list is untouched
    pub fn select_place(&mut self, place: &PlaceResult) -> Result<(), MapError> {
        self.clear_selection();

        self.map.set_center(place.position, Some(SEARCH_ZOOM))?;
        let marker = self
            .map
            .add_marker(place.position, &palette::search_marker_style())?;
        self.temp = Some(TempMarker { marker, info: None });

        let info = self.map.open_info(place.position, &info::place_info(place))?;
        if let Some(temp) = self.temp.as_mut() {
            temp.info = Some(info);
        }

        info!("Selected place {} ({})", place.name, place.id);
        self.events.emit(MapEvent::PlaceSelected(place.clone()));
        Ok(())
    }

    /// Remove the temporary search pin, if any
    pub fn clear_selection(&mut self) {
        if let Some(temp) = self.temp.take() {
            if let Some(info) = temp.info {
                self.map.close_info(info);
            }
            self.map.remove_marker(temp.marker);
        }
    }

    pub fn has_selection(&self) -> bool {
        self.temp.is_some()
    }

    /// Click on empty map surface: reverse geocode into a registration draft
    pub async fn handle_map_click(
        &self,
        position: LatLng,
        geocoder: &dyn Geocoder,
        today: NaiveDate,
    ) -> Result<RegistrationDraft, MapError> {
        self.events.emit(MapEvent::MapClicked(position));

        let address = geocoder.reverse_geocode(position).await?.unwrap_or_default();
        Ok(RegistrationDraft::at(position, address, today))
    }

    fn close_marker_info(&mut self) {
        if let Some(info) = self.open_marker_info.take() {
            self.map.close_info(info);
        }
    }
}
