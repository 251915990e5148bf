use bikeshare_stats::filter::{self, DayFilter, MonthFilter};
use bikeshare_stats::loader::{TimestampPolicy, read_trips};
use bikeshare_stats::report::Report;
use bikeshare_stats::stats::Availability;
use bikeshare_stats::table::TripTable;

fn load_chicago() -> TripTable {
    let bytes = include_bytes!("fixtures/sample_chicago.csv");
    read_trips(&bytes[..], TimestampPolicy::default()).expect("Failed to load fixture")
}

fn load_washington() -> TripTable {
    let bytes = include_bytes!("fixtures/sample_washington.csv");
    read_trips(&bytes[..], TimestampPolicy::default()).expect("Failed to load fixture")
}

#[test]
fn test_full_pipeline_january() {
    let table = load_chicago();
    assert_eq!(table.len(), 3);
    assert_eq!(table.invalid_timestamps(), 0);

    let month = MonthFilter::parse("January").unwrap();
    let filtered = filter::apply(&table, month, DayFilter::All);
    assert_eq!(filtered.len(), 2);

    let report = Report::compute("chicago", "january", "all", &filtered).unwrap();

    assert_eq!(report.stations.common_start, "A");
    assert_eq!(report.stations.common_trip, "A to B");
    assert_eq!(report.durations.total_seconds, 300.0);
    assert_eq!(report.durations.mean_seconds, 150.0);

    let counts = &report.users.user_types;
    assert_eq!(counts.len(), 2);
    assert!(counts.iter().any(|c| c.value == "Subscriber" && c.count == 1));
    assert!(counts.iter().any(|c| c.value == "Customer" && c.count == 1));
}

#[test]
fn test_unfiltered_report_uses_whole_table() {
    let table = load_chicago();
    let filtered = filter::apply(&table, MonthFilter::All, DayFilter::All);
    assert_eq!(filtered.len(), 3);

    let report = Report::compute("chicago", "all", "all", &filtered).unwrap();

    assert_eq!(report.time.common_month, 1);
    assert_eq!(report.time.common_day, "Sunday");
    assert_eq!(report.time.common_hour, 8);
    assert_eq!(report.durations.total_seconds, 350.0);

    match &report.users.birth_years {
        Availability::Available(years) => {
            assert_eq!(years.earliest, 1959);
            assert_eq!(years.latest, 1992);
            // all years appear once; the first row's year wins
            assert_eq!(years.common, 1989);
        }
        Availability::Unavailable => panic!("fixture has a birth year column"),
    }
}

#[test]
fn test_demographics_unavailable_for_washington_shaped_source() {
    let table = load_washington();
    let report = Report::compute("washington", "all", "all", &table).unwrap();

    assert_eq!(report.users.gender, Availability::Unavailable);
    assert_eq!(report.users.birth_years, Availability::Unavailable);
    assert_eq!(report.users.user_types[0].value, "Subscriber");
    assert_eq!(report.users.user_types[0].count, 2);
}

#[test]
fn test_filter_to_empty_selection_is_recoverable() {
    let table = load_chicago();
    let month = MonthFilter::parse("December").unwrap();
    let filtered = filter::apply(&table, month, DayFilter::All);

    assert!(filtered.is_empty());
    assert!(Report::compute("chicago", "december", "all", &filtered).is_err());
}

#[test]
fn test_raw_row_paging_over_filtered_table() {
    let table = load_washington();
    // 2017-03-04 was a Saturday
    let day = DayFilter::parse("saturday").unwrap();
    let filtered = filter::apply(&table, MonthFilter::All, day);

    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered.page(0, 5).len(), 2);
    assert_eq!(filtered.page(0, 1)[0].start_station, "F");
    assert_eq!(filtered.page(1, 2)[0].start_station, "E");
    assert!(filtered.page(2, 7).is_empty());
}

#[test]
fn test_report_json_round_trips_availability_tags() {
    let table = load_washington();
    let report = Report::compute("washington", "all", "all", &table).unwrap();
    let json = report.to_json().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["users"]["gender"]["status"], "unavailable");
    assert_eq!(parsed["rows"], 3);
}
