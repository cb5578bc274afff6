//! Popup content builders
//!
//! Content is structured text; the provider decides how to lay it out.

use chrono::NaiveDate;
use footprint_common::models::MAX_RATING;
use footprint_common::Location;

use super::palette::{self, ACCENT_COLOR};
use super::PlaceResult;

#[derive(Debug, Clone, PartialEq)]
pub struct InfoContent {
    pub title: String,
    pub accent: &'static str,
    pub lines: Vec<String>,
    pub footer: Option<String>,
}

/// Popup for a location marker
pub fn marker_info(location: &Location) -> InfoContent {
    let style = palette::marker_style(location.category);

    let address = if location.address.trim().is_empty() {
        "주소 없음"
    } else {
        location.address.as_str()
    };

    let when = match location.visit_time {
        Some(time) => format!("📅 {} {}", location.effective_date(), time.format("%H:%M")),
        None => format!("📅 {}", location.effective_date()),
    };

    let rating = if location.rating == 0 {
        "⭐ 평점 없음".to_string()
    } else {
        let filled = location.rating.min(MAX_RATING) as usize;
        format!(
            "⭐ {}{}",
            "★".repeat(filled),
            "☆".repeat(MAX_RATING as usize - filled)
        )
    };

    let mut lines = vec![format!("📍 {}", address), when, rating];
    if let Some(memo) = location.memo.as_deref().filter(|m| !m.trim().is_empty()) {
        lines.push(memo.to_string());
    }

    InfoContent {
        title: format!("{} {}", style.emoji, location.name),
        accent: style.color,
        lines,
        footer: None,
    }
}

/// Itinerary popup for a date line; `ordered` is already sorted by time of day
pub fn itinerary_info(date: NaiveDate, day_of_week: usize, ordered: &[&Location]) -> InfoContent {
    let day_name = palette::day_name(day_of_week);

    let mut lines = vec![format!("총 {}곳 방문", ordered.len())];
    lines.extend(ordered.iter().enumerate().map(|(index, location)| {
        let time = location
            .visit_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        let arrow = if index + 1 < ordered.len() { " →" } else { "" };
        format!("{} {}{}", time, location.name, arrow)
            .trim_start()
            .to_string()
    }));

    InfoContent {
        title: format!("{} ({}요일) 데이트 코스", date, day_name),
        accent: palette::day_color(day_of_week),
        lines,
        footer: Some(format!("💕 {}요일의 추억 라인", day_name)),
    }
}

/// Popup for the temporary search pin
pub fn place_info(place: &PlaceResult) -> InfoContent {
    let mut lines = vec![format!("📍 {}", place.display_address())];
    if let Some(phone) = place.phone.as_deref().filter(|p| !p.is_empty()) {
        lines.push(format!("📞 {}", phone));
    }

    InfoContent {
        title: format!("🔍 {}", place.name),
        accent: ACCENT_COLOR,
        lines,
        footer: Some("💕 추억 장소로 추가".to_string()),
    }
}
