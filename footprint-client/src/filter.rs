//! Filter engine, date grouping and statistics
//!
//! Pure functions over borrowed locations. Callers own the list; nothing
//! here reorders or copies records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use footprint_common::time::same_month;
use footprint_common::{Category, Location};

/// Records passing the category set and the text query
///
/// An empty category set passes every category; an empty (or blank) query
/// passes every record. Text matching is a case-insensitive substring test
/// over name, address and memo.
pub fn apply_filters<'a>(
    locations: &'a [Location],
    active_categories: &BTreeSet<Category>,
    query: &str,
) -> Vec<&'a Location> {
    let needle = query.trim().to_lowercase();

    locations
        .iter()
        .filter(|location| {
            active_categories.is_empty() || active_categories.contains(&location.category)
        })
        .filter(|location| needle.is_empty() || location.matches_lowercase(&needle))
        .collect()
}

/// Locations sharing one effective date
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    /// Members in input order
    pub members: Vec<&'a Location>,
}

impl<'a> DateGroup<'a> {
    /// Members ordered by time of day (missing time sorts as 00:00, ties keep input order)
    pub fn by_time_of_day(&self) -> Vec<&'a Location> {
        let mut ordered = self.members.clone();
        ordered.sort_by_key(|location| location.time_of_day());
        ordered
    }

    /// 0 = Sunday .. 6 = Saturday
    pub fn day_of_week(&self) -> usize {
        self.date.weekday().num_days_from_sunday() as usize
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group by effective date, newest date first
pub fn group_by_date<'a, I>(locations: I) -> Vec<DateGroup<'a>>
where
    I: IntoIterator<Item = &'a Location>,
{
    let mut groups: BTreeMap<NaiveDate, Vec<&'a Location>> = BTreeMap::new();
    for location in locations {
        groups
            .entry(location.effective_date())
            .or_default()
            .push(location);
    }

    groups
        .into_iter()
        .rev()
        .map(|(date, members)| DateGroup { date, members })
        .collect()
}

/// Aggregate statistics shown in the header
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub count: usize,
    /// `None` when there are no records
    pub average_rating: Option<f64>,
    /// Ties resolve to the category encountered first
    pub most_frequent_category: Option<Category>,
    /// Records whose effective date falls in the current calendar month
    pub recent_count: usize,
}

impl Stats {
    /// One decimal place, or "-" with nothing to average
    pub fn average_label(&self) -> String {
        match self.average_rating {
            Some(average) => format!("{:.1}", average),
            None => "-".to_string(),
        }
    }
}

pub fn compute_stats<'a, I>(locations: I, today: NaiveDate) -> Stats
where
    I: IntoIterator<Item = &'a Location>,
{
    let mut count = 0usize;
    let mut rating_sum = 0u64;
    let mut recent_count = 0usize;
    // First-encounter order is kept so ties go to the earliest category
    let mut tallies: Vec<(Category, usize)> = Vec::new();

    for location in locations {
        count += 1;
        rating_sum += u64::from(location.rating);

        if same_month(location.effective_date(), today) {
            recent_count += 1;
        }

        match tallies
            .iter_mut()
            .find(|(category, _)| *category == location.category)
        {
            Some((_, n)) => *n += 1,
            None => tallies.push((location.category, 1)),
        }
    }

    let mut most_frequent: Option<(Category, usize)> = None;
    for (category, n) in tallies {
        if most_frequent.map_or(true, |(_, best)| n > best) {
            most_frequent = Some((category, n));
        }
    }

    Stats {
        count,
        average_rating: (count > 0).then(|| rating_sum as f64 / count as f64),
        most_frequent_category: most_frequent.map(|(category, _)| category),
        recent_count,
    }
}
