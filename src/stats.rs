//! Descriptive statistics over a trip table.
//!
//! Four independent groups: times of travel, station popularity, trip
//! durations, and user demographics. Mode tie-breaks are fixed so results
//! are deterministic: the month statistic prefers the lowest numeric month,
//! every other mode prefers the value seen first in row order.

use crate::error::{Error, Result};
use crate::table::{TripTable, weekday_name};
use chrono::Timelike;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Outcome of a statistic that depends on an optional source column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum Availability<T> {
    Available(T),
    /// The column was absent from the source; not an error.
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }
}

/// One entry of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Numeric month, 1-12.
    pub common_month: u32,
    /// Full weekday name.
    pub common_day: String,
    /// Hour of day, 0-23.
    pub common_hour: u32,
}

impl TimeStats {
    pub fn compute(table: &TripTable) -> Result<Self> {
        let rows = table.rows();

        let mut month_counts = [0usize; 12];
        for trip in rows {
            month_counts[(trip.month - 1) as usize] += 1;
        }
        // Only a strictly higher count displaces the pick, so the lowest
        // month wins ties.
        let mut common_month = 0u32;
        let mut best = 0usize;
        for (i, &count) in month_counts.iter().enumerate() {
            if count > best {
                best = count;
                common_month = i as u32 + 1;
            }
        }
        if best == 0 {
            return Err(Error::EmptyAggregation("times of travel"));
        }

        let common_day = mode_first_seen(rows.iter().map(|t| t.weekday), "day of week")?;
        let common_hour = mode_first_seen(rows.iter().map(|t| t.start_time.hour()), "start hour")?;

        Ok(TimeStats {
            common_month,
            common_day: weekday_name(common_day).to_string(),
            common_hour,
        })
    }
}

/// Most popular stations and station pairing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub common_start: String,
    pub common_end: String,
    /// `"{start} to {end}"` pairing.
    pub common_trip: String,
}

impl StationStats {
    pub fn compute(table: &TripTable) -> Result<Self> {
        let rows = table.rows();
        let common_start =
            mode_first_seen(rows.iter().map(|t| t.start_station.as_str()), "start station")?;
        let common_end =
            mode_first_seen(rows.iter().map(|t| t.end_station.as_str()), "end station")?;
        let common_trip = mode_first_seen(rows.iter().map(|t| t.route()), "trip")?;

        Ok(StationStats {
            common_start: common_start.to_string(),
            common_end: common_end.to_string(),
            common_trip,
        })
    }
}

/// Sum of trip durations in seconds. Zero for an empty table.
pub fn total_travel_time(table: &TripTable) -> f64 {
    table.rows().iter().map(|t| t.duration_secs).sum()
}

/// Arithmetic mean of trip durations in seconds.
pub fn mean_travel_time(table: &TripTable) -> Result<f64> {
    if table.is_empty() {
        return Err(Error::EmptyAggregation("mean travel time"));
    }
    Ok(total_travel_time(table) / table.len() as f64)
}

/// Total and mean trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
}

impl DurationStats {
    pub fn compute(table: &TripTable) -> Result<Self> {
        Ok(DurationStats {
            total_seconds: total_travel_time(table),
            mean_seconds: mean_travel_time(table)?,
        })
    }
}

/// Earliest, latest, and most common rider birth year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub common: i32,
}

/// Rider demographics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    /// Frequency of each user type, descending by count.
    pub user_types: Vec<ValueCount>,
    pub gender: Availability<Vec<ValueCount>>,
    pub birth_years: Availability<BirthYearStats>,
}

impl UserStats {
    pub fn compute(table: &TripTable) -> Result<Self> {
        let rows = table.rows();

        let user_types = count_values(rows.iter().map(|t| t.user_type.as_str()));

        // Column presence is a table-level property, checked once.
        let gender = if table.has_gender() {
            let counts = count_values(rows.iter().filter_map(|t| t.gender.as_deref()));
            Availability::Available(counts)
        } else {
            Availability::Unavailable
        };

        let birth_years = if table.has_birth_year() {
            let years: Vec<i32> = rows.iter().filter_map(|t| t.birth_year).collect();
            if years.is_empty() {
                return Err(Error::EmptyAggregation("birth years"));
            }
            let common = mode_first_seen(years.iter().copied(), "birth years")?;
            let earliest = *years.iter().min().unwrap();
            let latest = *years.iter().max().unwrap();
            Availability::Available(BirthYearStats {
                earliest,
                latest,
                common,
            })
        } else {
            Availability::Unavailable
        };

        Ok(UserStats {
            user_types,
            gender,
            birth_years,
        })
    }
}

/// Most frequent value; the first-seen value wins ties.
fn mode_first_seen<T, I>(values: I, what: &'static str) -> Result<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut order: Vec<T> = Vec::new();

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in order {
        let count = counts[&value];
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value)
        .ok_or(Error::EmptyAggregation(what))
}

/// Frequency table in descending count order; ties keep first-seen order.
fn count_values<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut out: Vec<ValueCount> = order
        .into_iter()
        .map(|value| ValueCount {
            value: value.to_string(),
            count: counts[value],
        })
        .collect();
    // stable sort keeps first-seen order within equal counts
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}
