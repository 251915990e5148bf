//! Interactive exploration loop: pick a city and filters, view the report,
//! page through raw rows, repeat.

use anyhow::Result;
use bikeshare_stats::config::CityData;
use bikeshare_stats::error::Error;
use bikeshare_stats::filter::{self, DayFilter, MonthFilter};
use bikeshare_stats::loader::{self, TimestampPolicy};
use bikeshare_stats::report::Report;
use bikeshare_stats::table::TripTable;
use std::io::{self, BufRead, Write};
use tracing::debug;

const PAGE_SIZE: usize = 5;

pub fn run(cities: &CityData) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Hello! Let's explore some US bikeshare data!");

    loop {
        let Some(city) = select_city(&mut input, cities)? else {
            break;
        };
        let Some((month_raw, month)) = select_month(&mut input)? else {
            break;
        };
        let Some((day_raw, day)) = select_day(&mut input)? else {
            break;
        };

        // Fresh load every cycle; nothing is cached across restarts.
        let path = cities.resolve(&city)?;
        let table = loader::load_trips(path, TimestampPolicy::DropAndCount)?;
        let filtered = filter::apply(&table, month, day);
        debug!(city = %city, rows = filtered.len(), "Selection ready");

        match Report::compute(&city, &month_raw, &day_raw, &filtered) {
            Ok(report) => println!("\n{}", report.render()),
            Err(Error::EmptyAggregation(_)) => {
                println!("\nNo trips match those filters.");
            }
            Err(e) => return Err(e.into()),
        }

        if !page_raw_rows(&mut input, &filtered)? {
            break;
        }

        match prompt(&mut input, "\nWould you like to restart? Enter yes or no.")? {
            Some(answer) if answer.eq_ignore_ascii_case("yes") => continue,
            _ => break,
        }
    }

    Ok(())
}

/// Prompts until the answer names a configured city. `None` means EOF.
fn select_city(input: &mut impl BufRead, cities: &CityData) -> Result<Option<String>> {
    let options = cities.cities().join(", ");
    loop {
        let Some(answer) = prompt(input, &format!("Enter a city ({options}):"))? else {
            return Ok(None);
        };
        match cities.resolve(&answer) {
            Ok(_) => return Ok(Some(answer.trim().to_lowercase())),
            Err(e) => println!("{e}. Please try again."),
        }
    }
}

/// Prompts until the answer parses as a month filter. Returns the normalized
/// text alongside the parsed filter; `None` means EOF.
fn select_month(input: &mut impl BufRead) -> Result<Option<(String, MonthFilter)>> {
    loop {
        let Some(answer) = prompt(input, "Enter a month (January through December, or all):")?
        else {
            return Ok(None);
        };
        match MonthFilter::parse(&answer) {
            Ok(parsed) => return Ok(Some((answer.trim().to_lowercase(), parsed))),
            Err(e) => println!("{e}. Please try again."),
        }
    }
}

/// Prompts until the answer parses as a day filter. `None` means EOF.
fn select_day(input: &mut impl BufRead) -> Result<Option<(String, DayFilter)>> {
    loop {
        let message = "Enter a day of the week (Monday through Sunday, or all):";
        let Some(answer) = prompt(input, message)? else {
            return Ok(None);
        };
        match DayFilter::parse(&answer) {
            Ok(parsed) => return Ok(Some((answer.trim().to_lowercase(), parsed))),
            Err(e) => println!("{e}. Please try again."),
        }
    }
}

/// Offers the filtered rows in pages of [`PAGE_SIZE`]. Returns `false` on EOF.
fn page_raw_rows(input: &mut impl BufRead, table: &TripTable) -> Result<bool> {
    let mut start = 0;
    loop {
        let Some(answer) = prompt(input, "\nWould you like to see raw data? Enter yes or no.")?
        else {
            return Ok(false);
        };
        if !answer.eq_ignore_ascii_case("yes") {
            return Ok(true);
        }

        let page = table.page(start, start + PAGE_SIZE);
        if page.is_empty() {
            println!("No more rows to show.");
            return Ok(true);
        }
        for trip in page {
            println!("{trip:?}");
        }
        start += PAGE_SIZE;
    }
}

/// Writes a prompt and reads one trimmed line. `None` means stdin closed.
fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    println!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
