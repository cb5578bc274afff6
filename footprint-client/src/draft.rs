//! Pre-filled registration form
//!
//! A draft is produced by a map click or a search result and only becomes a
//! stored record once submitted through the API.

use chrono::{NaiveDate, NaiveTime};
use footprint_common::models::MAX_RATING;
use footprint_common::{Category, CoupleCode, LatLng, NewLocation};

use crate::error::ClientError;
use crate::map::PlaceResult;

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDraft {
    pub name: String,
    pub address: String,
    pub position: LatLng,
    pub category: Category,
    pub rating: u8,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub memo: String,
    /// Data URLs
    pub photos: Vec<String>,
}

impl RegistrationDraft {
    /// Blank draft at a clicked coordinate
    pub fn at(position: LatLng, address: String, today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            address,
            position,
            category: Category::Etc,
            rating: 0,
            date: today,
            time: None,
            memo: String::new(),
            photos: Vec::new(),
        }
    }

    /// Draft from a place search result, category suggested from the place
    pub fn from_place(place: &PlaceResult, today: NaiveDate) -> Self {
        Self {
            name: place.name.clone(),
            category: Category::from_place_category(&place.category_name),
            ..Self::at(place.position, place.display_address().to_string(), today)
        }
    }

    /// Required-field check done before anything is sent
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.address.trim().is_empty() {
            missing.push("address");
        }
        if self.rating == 0 {
            missing.push("rating");
        }
        if !missing.is_empty() {
            return Err(ClientError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        if self.rating > MAX_RATING {
            return Err(ClientError::Validation(format!(
                "rating must be at most {}",
                MAX_RATING
            )));
        }
        Ok(())
    }

    /// Request body for `POST /api/restaurants`
    pub fn into_request(self, code: &CoupleCode) -> NewLocation {
        let memo = self.memo.trim().to_string();
        NewLocation {
            couple_code: code.to_string(),
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            lat: self.position.lat,
            lng: self.position.lng,
            category: self.category,
            rating: i64::from(self.rating),
            date: Some(self.date),
            time: self.time,
            memo: (!memo.is_empty()).then_some(memo),
            photos: self.photos,
        }
    }
}
