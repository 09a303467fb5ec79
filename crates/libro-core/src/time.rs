//! Date-range filtering of an already-built journal

use chrono::{Datelike, NaiveDate};
use libro_config::Period;
use serde::{Deserialize, Serialize};

use crate::models::TransactionView;

/// Inclusive date range; a missing bound is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Range that matches every date
    pub fn all() -> Self {
        Self::default()
    }

    /// Closed range from `start` to `end`, both inclusive
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Resolve a configured period relative to `today`.
    ///
    /// `Custom` has no bounds of its own; callers supply them with `between`.
    pub fn for_period(period: Period, today: NaiveDate) -> Self {
        match period {
            Period::Month => Self {
                start: today.with_day(1),
                end: last_day_of_month(today.year(), today.month()),
            },
            Period::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                Self {
                    start: NaiveDate::from_ymd_opt(today.year(), first_month, 1),
                    end: last_day_of_month(today.year(), first_month + 2),
                }
            }
            Period::Year => Self {
                start: NaiveDate::from_ymd_opt(today.year(), 1, 1),
                end: NaiveDate::from_ymd_opt(today.year(), 12, 31),
            },
            Period::All | Period::Custom => Self::all(),
        }
    }

    /// Check if a date is within the range
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Get a human-readable description of the range
    pub fn description(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All Time".to_string(),
            (Some(s), None) => format!("From {}", s),
            (None, Some(e)) => format!("Until {}", e),
            (Some(s), Some(e)) => format!("{} to {}", s, e),
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Date filtering trait
pub trait DateFilter {
    /// Check if the item falls within the range
    fn filter_by_date(&self, range: &DateRange) -> bool;
}

impl DateFilter for TransactionView {
    fn filter_by_date(&self, range: &DateRange) -> bool {
        range.contains(&self.transaction.date)
    }
}

/// Keep the views dated within `range`, preserving journal order
pub fn filter_journal<'a>(views: &'a [TransactionView], range: &DateRange) -> Vec<&'a TransactionView> {
    views.iter().filter(|v| v.filter_by_date(range)).collect()
}
