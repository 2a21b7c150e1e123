//! Filing and payment deadline calendar.
//!
//! Deadlines are fixed calendar rules derived from the tax year: the annual
//! return falls due on April 15 of the following year, and quarterly
//! payments on May 15, August 15, and November 15 of the tax year plus
//! January 15 of the following year. Individual, business, and corporate
//! filers currently share the same statutory dates; the per-category split
//! in [`TaxDeadlineSet`] is where they would diverge.

use chrono::NaiveDate;

use crate::models::{DeadlineSchedule, TaxDeadlineSet};

/// The full deadline calendar for `tax_year`.
pub fn deadline_schedule(tax_year: i32) -> TaxDeadlineSet {
    TaxDeadlineSet {
        tax_year,
        individual: schedule_for(tax_year),
        business: schedule_for(tax_year),
        corporate: schedule_for(tax_year),
    }
}

fn schedule_for(tax_year: i32) -> DeadlineSchedule {
    DeadlineSchedule {
        annual: fixed_date(tax_year + 1, 4, 15),
        quarterly: [
            fixed_date(tax_year, 5, 15),
            fixed_date(tax_year, 8, 15),
            fixed_date(tax_year, 11, 15),
            fixed_date(tax_year + 1, 1, 15),
        ],
    }
}

/// Statutory month/day pairs exist in every calendar year.
fn fixed_date(
    year: i32,
    month: u32,
    day: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("statutory deadline is a valid date")
}
