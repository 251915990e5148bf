//! In-memory trip table with calendar columns derived from the start time.

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::Serialize;

/// A single bicycle rental event.
///
/// `month` and `weekday` are derived from `start_time` when the record is
/// built and are never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub duration_secs: f64,
    pub user_type: String,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    pub month: u32,
    pub weekday: Weekday,
}

impl Trip {
    /// The start/end station pairing, e.g. `"A to B"`.
    pub fn route(&self) -> String {
        format!("{} to {}", self.start_station, self.end_station)
    }
}

/// Computes the calendar columns (month 1-12, weekday) for a start time.
pub fn derive_calendar(start_time: NaiveDateTime) -> (u32, Weekday) {
    (start_time.month(), start_time.weekday())
}

/// Full English name for a weekday, matching the source data's day names.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A city's trip records for one analysis cycle.
///
/// The column set is fixed at load time: `has_gender`/`has_birth_year` record
/// whether the demographic columns existed in the source at all, which is a
/// per-source property, never a per-row one.
#[derive(Debug, Clone, Default)]
pub struct TripTable {
    rows: Vec<Trip>,
    has_gender: bool,
    has_birth_year: bool,
    invalid_timestamps: usize,
}

impl TripTable {
    pub fn new(
        rows: Vec<Trip>,
        has_gender: bool,
        has_birth_year: bool,
        invalid_timestamps: usize,
    ) -> Self {
        Self {
            rows,
            has_gender,
            has_birth_year,
            invalid_timestamps,
        }
    }

    /// A narrowed copy of this table carrying the same column metadata.
    pub fn with_rows(&self, rows: Vec<Trip>) -> Self {
        Self {
            rows,
            has_gender: self.has_gender,
            has_birth_year: self.has_birth_year,
            invalid_timestamps: self.invalid_timestamps,
        }
    }

    pub fn rows(&self) -> &[Trip] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_gender(&self) -> bool {
        self.has_gender
    }

    pub fn has_birth_year(&self) -> bool {
        self.has_birth_year
    }

    /// Rows rejected during load because the start time failed to parse.
    pub fn invalid_timestamps(&self) -> usize {
        self.invalid_timestamps
    }

    /// Returns rows `start..end` in table order, clamped to the table bounds.
    ///
    /// Backs the interactive "show raw data" paging.
    pub fn page(&self, start: usize, end: usize) -> &[Trip] {
        let start = start.min(self.rows.len());
        let end = end.clamp(start, self.rows.len());
        &self.rows[start..end]
    }
}
