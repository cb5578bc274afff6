//! Record models and wire DTOs
//!
//! Two shapes travel over the wire:
//! - [`NewLocation`] is what the client submits (`coupleCode`, `lat`, `lng`, `date`, ...)
//! - [`Location`] is the stored row (`couple_code`, `latitude`, `longitude`, `visit_date`, ...)
//!
//! The server maps one into the other at the store boundary; nothing else in
//! the workspace deals with loosely shaped records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoupleCode, Error, Result};

/// Highest rating a record may carry
pub const MAX_RATING: u8 = 5;

/// Place category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Cafe,
    Travel,
    Culture,
    /// Catch-all; unknown values read back from storage land here
    #[serde(other)]
    Etc,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 5] = [
        Category::Restaurant,
        Category::Cafe,
        Category::Travel,
        Category::Culture,
        Category::Etc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Travel => "travel",
            Category::Culture => "culture",
            Category::Etc => "etc",
        }
    }

    /// Display label used by filter chips and timeline headers
    pub fn label(&self) -> &'static str {
        match self {
            Category::Restaurant => "맛집",
            Category::Cafe => "카페",
            Category::Travel => "여행",
            Category::Culture => "문화",
            Category::Etc => "기타",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Restaurant => "🍽️",
            Category::Cafe => "☕",
            Category::Travel => "✈️",
            Category::Culture => "🎨",
            Category::Etc => "📍",
        }
    }

    /// Lenient conversion used at the storage boundary
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or(Category::Etc)
    }

    /// Suggest a category from a places-provider category path
    /// (e.g. "음식점 > 한식 > 국수")
    pub fn from_place_category(category_name: &str) -> Self {
        if category_name.contains("카페") {
            Category::Cafe
        } else if category_name.contains("음식") {
            Category::Restaurant
        } else if category_name.contains("관광") || category_name.contains("숙박") {
            Category::Travel
        } else if category_name.contains("문화") {
            Category::Culture
        } else {
            Category::Etc
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Ok(Category::Restaurant),
            "cafe" => Ok(Category::Cafe),
            "travel" => Ok(Category::Travel),
            "culture" => Ok(Category::Culture),
            "etc" => Ok(Category::Etc),
            other => Err(Error::InvalidInput(format!("unknown category: {}", other))),
        }
    }
}

/// Geographic coordinate (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Couple row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Couple {
    pub couple_code: CoupleCode,
    pub anniversary_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Stored location/restaurant row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub couple_code: CoupleCode,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub rating: u8,
    pub visit_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm")]
    pub visit_time: Option<NaiveTime>,
    pub memo: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl Location {
    /// Visit date, falling back to the creation date
    pub fn effective_date(&self) -> NaiveDate {
        self.visit_date
            .unwrap_or_else(|| self.created_at.date_naive())
    }

    /// Time of day used to order a day's itinerary; missing means midnight
    pub fn time_of_day(&self) -> NaiveTime {
        self.visit_time.unwrap_or(NaiveTime::MIN)
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Case-insensitive substring match over name, address and memo
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
            || self
                .memo
                .as_deref()
                .map(|memo| memo.to_lowercase().contains(needle))
                .unwrap_or(false)
    }
}

/// Create-location request body as submitted by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub couple_code: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type", default = "default_category")]
    pub category: Category,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

fn default_category() -> Category {
    Category::Etc
}

impl NewLocation {
    /// Check the record invariants that must hold before insert
    ///
    /// Returns the parsed couple code on success.
    pub fn validate(&self) -> Result<CoupleCode> {
        let code = CoupleCode::parse(&self.couple_code)?;

        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("name is required".to_string()));
        }
        if !(0..=MAX_RATING as i64).contains(&self.rating) {
            return Err(Error::InvalidInput(format!(
                "rating must be between 0 and {}, got {}",
                MAX_RATING, self.rating
            )));
        }
        if !LatLng::new(self.lat, self.lng).is_valid() {
            return Err(Error::InvalidInput(format!(
                "coordinates out of range: {}, {}",
                self.lat, self.lng
            )));
        }

        Ok(code)
    }

    /// Memo with blank input collapsed to `None`
    pub fn memo_trimmed(&self) -> Option<String> {
        self.memo
            .as_deref()
            .map(str::trim)
            .filter(|memo| !memo.is_empty())
            .map(str::to_string)
    }
}

/// Serde helper: optional "HH:MM" time-of-day, also accepting "HH:MM:SS"
///
/// Seconds survive a round trip: a time with non-zero seconds is written
/// back as "HH:MM:SS".
pub mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";
    const FORMAT_SECONDS: &str = "%H:%M:%S";

    pub fn format(time: &NaiveTime) -> String {
        if time.second() == 0 {
            time.format(FORMAT).to_string()
        } else {
            time.format(FORMAT_SECONDS).to_string()
        }
    }

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&format(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text).map(Some).map_err(serde::de::Error::custom),
        }
    }

    pub fn parse(text: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(text, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(text, FORMAT_SECONDS))
    }
}
