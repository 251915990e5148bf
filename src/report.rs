//! Structured result bundle for one analysis cycle.
//!
//! The engine never prints; callers render the bundle as text or JSON.

use crate::error::Result;
use crate::stats::{Availability, DurationStats, StationStats, TimeStats, UserStats};
use crate::table::TripTable;
use serde::Serialize;
use std::fmt::Write;

/// The four statistic groups plus the selection they were computed over.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub city: String,
    pub month_filter: String,
    pub day_filter: String,
    pub rows: usize,
    pub invalid_timestamps: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl Report {
    /// Computes all four groups over an already-filtered table.
    ///
    /// Fails with `EmptyAggregation` when the selection matched no rows.
    pub fn compute(
        city: &str,
        month_filter: &str,
        day_filter: &str,
        table: &TripTable,
    ) -> Result<Self> {
        Ok(Report {
            city: city.to_string(),
            month_filter: month_filter.to_string(),
            day_filter: day_filter.to_string(),
            rows: table.len(),
            invalid_timestamps: table.invalid_timestamps(),
            time: TimeStats::compute(table)?,
            stations: StationStats::compute(table)?,
            durations: DurationStats::compute(table)?,
            users: UserStats::compute(table)?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the report as display text.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "City: {} (month: {}, day: {})",
            self.city, self.month_filter, self.day_filter
        );
        let _ = writeln!(
            out,
            "{} trips analyzed, {} rows dropped for invalid timestamps",
            self.rows, self.invalid_timestamps
        );

        let _ = writeln!(out, "\nMost frequent times of travel");
        let _ = writeln!(out, "  Most common month: {}", self.time.common_month);
        let _ = writeln!(out, "  Most common day of week: {}", self.time.common_day);
        let _ = writeln!(out, "  Most common start hour: {}", self.time.common_hour);

        let _ = writeln!(out, "\nMost popular stations and trip");
        let _ = writeln!(out, "  Most common start station: {}", self.stations.common_start);
        let _ = writeln!(out, "  Most common end station: {}", self.stations.common_end);
        let _ = writeln!(out, "  Most common trip: {}", self.stations.common_trip);

        let _ = writeln!(out, "\nTrip durations");
        let _ = writeln!(
            out,
            "  Total travel time: {} seconds",
            self.durations.total_seconds
        );
        let _ = writeln!(
            out,
            "  Mean travel time: {:.2} seconds",
            self.durations.mean_seconds
        );

        let _ = writeln!(out, "\nUser profile");
        for entry in &self.users.user_types {
            let _ = writeln!(out, "  {}: {}", entry.value, entry.count);
        }
        match &self.users.gender {
            Availability::Available(counts) => {
                for entry in counts {
                    let _ = writeln!(out, "  {}: {}", entry.value, entry.count);
                }
            }
            Availability::Unavailable => {
                let _ = writeln!(out, "  Gender information is not available for this city");
            }
        }
        match &self.users.birth_years {
            Availability::Available(years) => {
                let _ = writeln!(out, "  Earliest birth year: {}", years.earliest);
                let _ = writeln!(out, "  Most recent birth year: {}", years.latest);
                let _ = writeln!(out, "  Most common birth year: {}", years.common);
            }
            Availability::Unavailable => {
                let _ = writeln!(out, "  Birth year information is not available for this city");
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::table::{Trip, derive_calendar};
    use chrono::NaiveDate;

    #[test]
    fn test_compute_bundles_all_groups() {
        let table = sample_table();
        let report = Report::compute("chicago", "all", "all", &table).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.time.common_month, 1);
        assert_eq!(report.stations.common_trip, "A to B");
        assert_eq!(report.durations.total_seconds, 300.0);
        assert_eq!(report.users.user_types[0].count, 1);
    }

    #[test]
    fn test_compute_empty_selection_signals() {
        let table = TripTable::default();
        assert!(matches!(
            Report::compute("chicago", "all", "all", &table),
            Err(Error::EmptyAggregation(_))
        ));
    }

    #[test]
    fn test_to_json_contains_group_keys() {
        let table = sample_table();
        let report = Report::compute("chicago", "january", "all", &table).unwrap();
        let json = report.to_json().unwrap();

        assert!(json.contains("\"common_month\": 1"));
        assert!(json.contains("\"total_seconds\""));
        assert!(json.contains("\"unavailable\""));
    }

    #[test]
    fn test_render_mentions_unavailable_demographics() {
        let table = sample_table();
        let report = Report::compute("washington", "all", "all", &table).unwrap();
        let text = report.render();

        assert!(text.contains("Most common start station: A"));
        assert!(text.contains("Gender information is not available"));
    }

    // Helper functions for tests
    fn sample_table() -> TripTable {
        let rows = [(8, "Subscriber", 100.0), (9, "Customer", 200.0)]
            .iter()
            .map(|&(hour, user, duration)| {
                let start_time = NaiveDate::from_ymd_opt(2017, 1, 1)
                    .unwrap()
                    .and_hms_opt(hour, 0, 0)
                    .unwrap();
                let (month, weekday) = derive_calendar(start_time);
                Trip {
                    start_time,
                    start_station: "A".to_string(),
                    end_station: "B".to_string(),
                    duration_secs: duration,
                    user_type: user.to_string(),
                    gender: None,
                    birth_year: None,
                    month,
                    weekday,
                }
            })
            .collect();
        TripTable::new(rows, false, false, 0)
    }
}
