//! Expected delivery date rule.
//!
//! Orders selected for home delivery before the 17:00 cutoff go out the same
//! day; later selections go out the next day. The rule works on the device's
//! local wall clock with no timezone normalization - the backend treats the
//! date as advisory, and a traveling customer may see a date one day off.

use chrono::{DateTime, Days, Local, Timelike};

/// Local hour after which same-day delivery is no longer offered.
pub const DELIVERY_CUTOFF_HOUR: u32 = 17;

/// Compute the expected delivery date for a home delivery selected at `now`.
#[must_use]
pub fn expected_delivery_date(now: DateTime<Local>) -> chrono::NaiveDate {
    let today = now.date_naive();
    if now.hour() < DELIVERY_CUTOFF_HOUR {
        today
    } else {
        // Adding one day never overflows for any realistic clock value
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }
}
