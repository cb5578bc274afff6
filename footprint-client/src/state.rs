//! Reducer-style client state
//!
//! All mutation goes through [`ClientState::apply`]; the visible set is
//! derived on demand from the location list and the active filters.

use std::collections::BTreeSet;

use footprint_common::{Category, Location};

use crate::filter::{self, DateGroup, Stats};

/// Which main view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Map,
    Timeline,
}

/// A category filter chip; `All` clears the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChip {
    All,
    Category(Category),
}

impl FilterChip {
    /// Chip from its id ("all", "cafe", ...)
    pub fn from_id(id: &str) -> Option<Self> {
        if id.eq_ignore_ascii_case("all") {
            return Some(FilterChip::All);
        }
        id.parse().ok().map(FilterChip::Category)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the list with a fresh fetch (newest first)
    Loaded(Vec<Location>),
    /// A record the server just stored
    Added(Location),
    Removed(i64),
    ToggleCategory(FilterChip),
    ClearCategories,
    SetQuery(String),
    SwitchView(View),
}

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    locations: Vec<Location>,
    active_categories: BTreeSet<Category>,
    query: String,
    view: View,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Loaded(locations) => self.locations = locations,
            Action::Added(location) => {
                self.locations.retain(|existing| existing.id != location.id);
                self.locations.insert(0, location);
            }
            Action::Removed(id) => self.locations.retain(|location| location.id != id),
            Action::ToggleCategory(FilterChip::All) | Action::ClearCategories => {
                self.active_categories.clear()
            }
            Action::ToggleCategory(FilterChip::Category(category)) => {
                if !self.active_categories.remove(&category) {
                    self.active_categories.insert(category);
                }
            }
            Action::SetQuery(query) => self.query = query,
            Action::SwitchView(view) => self.view = view,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn active_categories(&self) -> &BTreeSet<Category> {
        &self.active_categories
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Records passing the current filters, in list order
    pub fn visible(&self) -> Vec<&Location> {
        filter::apply_filters(&self.locations, &self.active_categories, &self.query)
    }

    /// Timeline sections for the visible records
    pub fn timeline(&self) -> Vec<DateGroup<'_>> {
        filter::group_by_date(self.visible())
    }

    /// Header statistics for the visible records
    ///
    /// With no filter active this covers every record.
    pub fn stats(&self, today: chrono::NaiveDate) -> Stats {
        filter::compute_stats(self.visible(), today)
    }
}
