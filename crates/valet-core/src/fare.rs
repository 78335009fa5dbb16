//! # Fare Calculation
//!
//! The single piece of non-trivial arithmetic in the system: elapsed time
//! under a rate becomes a bill. Pure function - no state, no clock reads.
//!
//! ## Billing Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Fare Tiering                                      │
//! │                                                                         │
//! │  1. billed_hours = max(1, ceil(elapsed_minutes / 60))                  │
//! │     Any fraction of an hour bills as a full hour; minimum one hour.    │
//! │                                                                         │
//! │  2. days  = billed_hours / 24      (whole 24-hour blocks)              │
//! │     rem   = billed_hours % 24      (hours past the last full day)      │
//! │                                                                         │
//! │  3. capped (daily_max > 0):                                            │
//! │       cost = days × daily_max + min(rem × hourly, daily_max)           │
//! │     uncapped (daily_max == 0):                                         │
//! │       cost = billed_hours × hourly                                     │
//! │                                                                         │
//! │  Why the remainder is capped too: a 25-hour stay at 2000/hour under    │
//! │  a 10000 cap bills 10000 + min(2000, 10000) = 12000, never the naive   │
//! │  25 × 2000 = 50000. And rem == 0 contributes nothing - exactly N full  │
//! │  days never wastes an extra daily charge.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FareError;
use crate::money::Money;

/// Result of a fare computation: the rounded duration and the final bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fare {
    /// Duration rounded up to whole hours, minimum 1.
    pub billed_hours: i64,

    /// Final bill in minor units.
    pub cost: Money,
}

/// Computes the bill for a stay.
///
/// ## Arguments
/// * `check_in` / `check_out` - session boundaries (wall clock, UTC)
/// * `hourly_rate` - price per billed hour
/// * `daily_max_rate` - cap per 24-hour block; zero means uncapped
///
/// ## Errors
/// `FareError::InvalidDuration` when `check_out < check_in`. Clock skew is
/// surfaced, never clamped.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use valet_core::fare::compute_fare;
/// use valet_core::money::Money;
///
/// let check_in = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
/// let check_out = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(); // 25h
///
/// let fare = compute_fare(
///     check_in,
///     check_out,
///     Money::from_minor(2000),
///     Money::from_minor(10000),
/// )
/// .unwrap();
///
/// // One full day at the cap plus one capped remainder hour.
/// assert_eq!(fare.billed_hours, 25);
/// assert_eq!(fare.cost, Money::from_minor(12000));
/// ```
pub fn compute_fare(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    hourly_rate: Money,
    daily_max_rate: Money,
) -> Result<Fare, FareError> {
    let elapsed = check_out.signed_duration_since(check_in);
    if elapsed < chrono::Duration::zero() {
        return Err(FareError::InvalidDuration { check_in, check_out });
    }

    let billed_hours = billed_hours(elapsed.num_minutes());

    let cost = if daily_max_rate.is_positive() {
        let days = billed_hours / 24;
        let remaining_hours = billed_hours % 24;
        let remainder = (hourly_rate * remaining_hours).min(daily_max_rate);
        daily_max_rate * days + remainder
    } else {
        hourly_rate * billed_hours
    };

    Ok(Fare { billed_hours, cost })
}

/// Rounds elapsed minutes up to whole billed hours, minimum 1.
///
/// A near-zero stay still bills one hour: the slot was held, the slot is
/// paid for.
fn billed_hours(elapsed_minutes: i64) -> i64 {
    let hours = (elapsed_minutes + 59) / 60; // ceiling division
    hours.max(1)
}

// =============================================================================
// Unit Tests
// =============================================================================
