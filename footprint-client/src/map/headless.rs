//! In-memory map provider
//!
//! Keeps every primitive in plain collections. Used where no map widget is
//! attached (batch tools, tests) and as the reference for provider behavior.

use std::collections::BTreeMap;

use footprint_common::LatLng;

use super::{InfoContent, InfoId, LineId, LineStyle, MapProvider, MarkerId, MarkerStyle};
use crate::error::MapError;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    pub position: LatLng,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLine {
    pub path: Vec<LatLng>,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessInfo {
    pub anchor: LatLng,
    pub content: InfoContent,
}

#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_id: u64,
    unavailable: bool,
    pub markers: BTreeMap<MarkerId, HeadlessMarker>,
    pub lines: BTreeMap<LineId, HeadlessLine>,
    pub infos: BTreeMap<InfoId, HeadlessInfo>,
    pub center: Option<(LatLng, Option<u8>)>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the widget going away: every drawing call fails until reset
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    fn check(&self) -> Result<(), MapError> {
        if self.unavailable {
            Err(MapError::Unavailable("map widget not attached".to_string()))
        } else {
            Ok(())
        }
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapProvider for HeadlessMap {
    fn add_marker(&mut self, position: LatLng, style: &MarkerStyle) -> Result<MarkerId, MapError> {
        self.check()?;
        let id = MarkerId(self.allocate());
        self.markers.insert(
            id,
            HeadlessMarker {
                position,
                style: style.clone(),
            },
        );
        Ok(id)
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn add_polyline(&mut self, path: &[LatLng], style: &LineStyle) -> Result<LineId, MapError> {
        self.check()?;
        let id = LineId(self.allocate());
        self.lines.insert(
            id,
            HeadlessLine {
                path: path.to_vec(),
                style: style.clone(),
            },
        );
        Ok(id)
    }

    fn set_polyline_style(&mut self, id: LineId, style: &LineStyle) -> Result<(), MapError> {
        self.check()?;
        let line = self
            .lines
            .get_mut(&id)
            .ok_or_else(|| MapError::UnknownObject(format!("line {}", id.0)))?;
        line.style = style.clone();
        Ok(())
    }

    fn remove_polyline(&mut self, id: LineId) {
        self.lines.remove(&id);
    }

    fn open_info(&mut self, anchor: LatLng, content: &InfoContent) -> Result<InfoId, MapError> {
        self.check()?;
        let id = InfoId(self.allocate());
        self.infos.insert(
            id,
            HeadlessInfo {
                anchor,
                content: content.clone(),
            },
        );
        Ok(id)
    }

    fn close_info(&mut self, id: InfoId) {
        self.infos.remove(&id);
    }

    fn set_center(&mut self, position: LatLng, zoom: Option<u8>) -> Result<(), MapError> {
        self.check()?;
        self.center = Some((position, zoom));
        Ok(())
    }
}
