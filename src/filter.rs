//! Temporal narrowing of a trip table.

use crate::error::{Error, Result};
use crate::table::TripTable;
use chrono::{Month, Weekday};

/// Selector value meaning "apply no filter".
pub const NO_FILTER: &str = "all";

/// Calendar-month filter, parsed from a month name or `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    /// Numeric month, 1-12.
    Month(u32),
}

impl MonthFilter {
    /// Parses a month selector, case-insensitively.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case(NO_FILTER) {
            return Ok(MonthFilter::All);
        }
        trimmed
            .parse::<Month>()
            .map(|m| MonthFilter::Month(m.number_from_month()))
            .map_err(|_| Error::InvalidSelector {
                kind: "month",
                value: input.to_string(),
            })
    }

    fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

/// Day-of-week filter, parsed from a weekday name or `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Day(Weekday),
}

impl DayFilter {
    /// Parses a day selector, case-insensitively.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case(NO_FILTER) {
            return Ok(DayFilter::All);
        }
        trimmed
            .parse::<Weekday>()
            .map(DayFilter::Day)
            .map_err(|_| Error::InvalidSelector {
                kind: "day",
                value: input.to_string(),
            })
    }

    fn matches(&self, weekday: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(d) => *d == weekday,
        }
    }
}

/// Retains the rows matching both filters.
///
/// The source table is untouched; the result is a new table with the same
/// column metadata, rows in their original order. The two predicates act on
/// disjoint derived columns, so applying them in either order is equivalent.
pub fn apply(table: &TripTable, month: MonthFilter, day: DayFilter) -> TripTable {
    let rows = table
        .rows()
        .iter()
        .filter(|t| month.matches(t.month) && day.matches(t.weekday))
        .cloned()
        .collect();
    table.with_rows(rows)
}
