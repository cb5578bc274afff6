//! Colors and stroke styles

use footprint_common::Category;

/// Line colors by day of week, 0 = Sunday
pub const DAY_COLORS: [&str; 7] = [
    "#ff69b4", // Sunday
    "#4285f4", // Monday
    "#34a853", // Tuesday
    "#fbbc04", // Wednesday
    "#ff6d01", // Thursday
    "#ea4335", // Friday
    "#9c27b0", // Saturday
];

/// Korean day names, 0 = Sunday
pub const DAY_NAMES: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

pub const ACCENT_COLOR: &str = "#ff69b4";

const LINE_WEIGHT: u32 = 4;
const LINE_OPACITY: f32 = 0.8;
const LINE_HOVER_WEIGHT: u32 = 6;
const LINE_HOVER_OPACITY: f32 = 1.0;

const MARKER_SIZE: u32 = 40;
const SEARCH_MARKER_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub emoji: &'static str,
    pub size: u32,
    /// Animated ring used for the temporary search pin
    pub pulsing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f32,
}

pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Restaurant => "#ff6b6b",
        Category::Cafe => "#4ecdc4",
        Category::Travel => "#45b7d1",
        Category::Culture => "#96ceb4",
        Category::Etc => "#feca57",
    }
}

pub fn marker_style(category: Category) -> MarkerStyle {
    MarkerStyle {
        color: category_color(category),
        emoji: category.emoji(),
        size: MARKER_SIZE,
        pulsing: false,
    }
}

pub fn search_marker_style() -> MarkerStyle {
    MarkerStyle {
        color: ACCENT_COLOR,
        emoji: "🔍",
        size: SEARCH_MARKER_SIZE,
        pulsing: true,
    }
}

/// Day color, wrapping out-of-range indexes
pub fn day_color(day_of_week: usize) -> &'static str {
    DAY_COLORS[day_of_week % DAY_COLORS.len()]
}

pub fn day_name(day_of_week: usize) -> &'static str {
    DAY_NAMES[day_of_week % DAY_NAMES.len()]
}

pub fn line_style(day_of_week: usize) -> LineStyle {
    LineStyle {
        color: day_color(day_of_week),
        weight: LINE_WEIGHT,
        opacity: LINE_OPACITY,
    }
}

pub fn line_hover_style(day_of_week: usize) -> LineStyle {
    LineStyle {
        color: day_color(day_of_week),
        weight: LINE_HOVER_WEIGHT,
        opacity: LINE_HOVER_OPACITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_colors() {
        assert_eq!(day_color(0), "#ff69b4");
        assert_eq!(day_color(6), "#9c27b0");
        assert_eq!(day_color(7), day_color(0));
        assert_eq!(day_name(3), "수");
    }

    #[test]
    fn test_line_styles() {
        let base = line_style(1);
        let hover = line_hover_style(1);
        assert_eq!((base.weight, base.opacity), (4, 0.8));
        assert_eq!((hover.weight, hover.opacity), (6, 1.0));
        assert_eq!(base.color, hover.color);
    }

    #[test]
    fn test_marker_styles() {
        let style = marker_style(Category::Cafe);
        assert_eq!(style.color, "#4ecdc4");
        assert_eq!(style.emoji, "☕");
        assert!(!style.pulsing);
        assert!(search_marker_style().pulsing);
    }
}
