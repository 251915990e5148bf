//! CSV ingestion for city trip logs.
//!
//! Reads a delimited source into a [`TripTable`], parsing start times and
//! deriving the calendar columns in the same pass. Presence of the optional
//! demographic columns is detected once from the header row.

use crate::error::{Error, Result};
use crate::table::{Trip, TripTable, derive_calendar};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Timestamp layout used by the city CSV files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const GENDER_COLUMN: &str = "Gender";
const BIRTH_YEAR_COLUMN: &str = "Birth Year";

/// One row as it appears in the source file. Extra columns (the files carry
/// an unnamed index and an `End Time`) are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "User Type")]
    user_type: String,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// What to do with a row whose start time fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Drop the row, log it, and report the total in
    /// [`TripTable::invalid_timestamps`].
    #[default]
    DropAndCount,
    /// Abort the whole load on the first bad row.
    Fail,
}

/// Loads a city's trip log from a CSV file on disk.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_trips(path: impl AsRef<Path>, policy: TimestampPolicy) -> Result<TripTable> {
    let file = File::open(path.as_ref())?;
    read_trips(file, policy)
}

/// Reads trip records from any CSV byte source.
pub fn read_trips<R: Read>(reader: R, policy: TimestampPolicy) -> Result<TripTable> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let has_gender = headers.iter().any(|h| h == GENDER_COLUMN);
    let has_birth_year = headers.iter().any(|h| h == BIRTH_YEAR_COLUMN);

    let mut rows = Vec::new();
    let mut invalid_timestamps = 0usize;

    for (idx, result) in rdr.deserialize().enumerate() {
        let raw: RawTrip = result?;
        // header occupies line 1 of the file
        let line = idx + 2;

        let start_time = match NaiveDateTime::parse_from_str(&raw.start_time, TIMESTAMP_FORMAT) {
            Ok(ts) => ts,
            Err(_) => match policy {
                TimestampPolicy::Fail => {
                    return Err(Error::InvalidTimestamp {
                        value: raw.start_time,
                        row: line,
                    });
                }
                TimestampPolicy::DropAndCount => {
                    warn!(line, value = %raw.start_time, "Dropping row with bad start time");
                    invalid_timestamps += 1;
                    continue;
                }
            },
        };

        let (month, weekday) = derive_calendar(start_time);
        rows.push(Trip {
            start_time,
            start_station: raw.start_station,
            end_station: raw.end_station,
            duration_secs: raw.trip_duration,
            user_type: raw.user_type,
            gender: raw.gender,
            birth_year: raw.birth_year.map(|y| y as i32),
            month,
            weekday,
        });
    }

    debug!(
        rows = rows.len(),
        invalid_timestamps, has_gender, has_birth_year, "Trip table loaded"
    );

    Ok(TripTable::new(
        rows,
        has_gender,
        has_birth_year,
        invalid_timestamps,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const FULL_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
0,2017-01-01 08:00:00,2017-01-01 08:01:40,100.0,A,B,Subscriber,Male,1989.0
1,2017-01-01 09:00:00,2017-01-01 09:03:20,200.0,A,B,Customer,Female,1992.0
2,2017-02-01 08:00:00,2017-02-01 08:00:50,50.0,C,D,Subscriber,,
";

    const NO_DEMOGRAPHICS_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,2017-03-03 12:30:00,2017-03-03 12:40:00,600.0,E,F,Subscriber
";

    #[test]
    fn test_read_trips_parses_rows_and_derives_calendar() {
        let table = read_trips(FULL_CSV.as_bytes(), TimestampPolicy::default()).unwrap();

        assert_eq!(table.len(), 3);
        let first = &table.rows()[0];
        assert_eq!(first.start_station, "A");
        assert_eq!(first.duration_secs, 100.0);
        assert_eq!(first.month, 1);
        assert_eq!(first.weekday, Weekday::Sun);
        assert_eq!(first.birth_year, Some(1989));
    }

    #[test]
    fn test_read_trips_detects_optional_columns() {
        let full = read_trips(FULL_CSV.as_bytes(), TimestampPolicy::default()).unwrap();
        assert!(full.has_gender());
        assert!(full.has_birth_year());

        let bare = read_trips(NO_DEMOGRAPHICS_CSV.as_bytes(), TimestampPolicy::default()).unwrap();
        assert!(!bare.has_gender());
        assert!(!bare.has_birth_year());
    }

    #[test]
    fn test_read_trips_empty_cells_in_present_column_are_none() {
        let table = read_trips(FULL_CSV.as_bytes(), TimestampPolicy::default()).unwrap();
        let last = &table.rows()[2];
        assert_eq!(last.gender, None);
        assert_eq!(last.birth_year, None);
    }

    #[test]
    fn test_read_trips_drops_and_counts_bad_timestamps() {
        let csv = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,2017-01-01 08:00:00,2017-01-01 08:01:40,100.0,A,B,Subscriber
1,not-a-timestamp,2017-01-01 09:03:20,200.0,A,B,Customer
2,2017-02-01 08:00:00,2017-02-01 08:00:50,50.0,C,D,Subscriber
";
        let table = read_trips(csv.as_bytes(), TimestampPolicy::DropAndCount).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.invalid_timestamps(), 1);
        assert_eq!(table.rows()[1].start_station, "C");
    }

    #[test]
    fn test_read_trips_strict_policy_aborts_load() {
        let csv = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,garbage,2017-01-01 08:01:40,100.0,A,B,Subscriber
";
        let err = read_trips(csv.as_bytes(), TimestampPolicy::Fail).unwrap_err();
        match err {
            Error::InvalidTimestamp { value, row } => {
                assert_eq!(value, "garbage");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_read_trips_empty_source_yields_empty_table() {
        let csv = ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n";
        let table = read_trips(csv.as_bytes(), TimestampPolicy::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.invalid_timestamps(), 0);
    }
}
