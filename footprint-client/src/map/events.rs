//! Map interaction events
//!
//! A broadcast bus the rest of the client subscribes to. Emitting with no
//! subscribers is fine; the renderer never waits on listeners.

use chrono::NaiveDate;
use footprint_common::{LatLng, Location};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::PlaceResult;

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A location marker was clicked
    MarkerSelected(Location),
    /// Click on empty map surface
    MapClicked(LatLng),
    LineHovered { date: NaiveDate },
    LineUnhovered { date: NaiveDate },
    /// A search result was focused on the map
    PlaceSelected(PlaceResult),
}

impl MapEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::MarkerSelected(_) => "MarkerSelected",
            MapEvent::MapClicked(_) => "MapClicked",
            MapEvent::LineHovered { .. } => "LineHovered",
            MapEvent::LineUnhovered { .. } => "LineUnhovered",
            MapEvent::PlaceSelected(_) => "PlaceSelected",
        }
    }
}

#[derive(Clone)]
pub struct MapEventBus {
    tx: broadcast::Sender<MapEvent>,
}

impl MapEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MapEvent> {
        self.tx.subscribe()
    }

    /// Emit, ignoring the no-subscriber case
    pub fn emit(&self, event: MapEvent) {
        let event_type = event.event_type();
        if self.tx.send(event).is_err() {
            debug!("No subscribers for {}", event_type);
        }
    }

    /// Run `handler` for every selected marker until the bus closes
    pub fn on_marker_selected<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: Fn(Location) + Send + 'static,
    {
        self.listen(move |event| {
            if let MapEvent::MarkerSelected(location) = event {
                handler(location);
            }
        })
    }

    /// Run `handler` for every click on empty map surface until the bus closes
    pub fn on_map_clicked<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: Fn(LatLng) + Send + 'static,
    {
        self.listen(move |event| {
            if let MapEvent::MapClicked(position) = event {
                handler(position);
            }
        })
    }

    fn listen<F>(&self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(MapEvent) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => handler(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Map event listener lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for MapEventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
