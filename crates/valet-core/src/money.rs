//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A 25-hour stay at 2000/hour under a 10000 daily cap must bill          │
//! │  exactly 12000 - not 11999.999… that rounds differently per machine.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    Every amount is an i64 count of the smallest currency unit.          │
//! │    The ledger, the fare math, and the API all agree to the last unit.   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use valet_core::money::Money;
//!
//! // Create from minor units (the only constructor)
//! let hourly = Money::from_minor(2000);
//!
//! // Arithmetic operations
//! let two_hours = hourly * 2;
//! let total = two_hours + Money::from_minor(500);
//! assert_eq!(total.minor(), 4500);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(20.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: allows adjustment/refund amounts in collaborators
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **`serde(transparent)`**: serializes as a bare integer on the wire
///
/// ## Where Money is Used
/// ```text
/// Rate.hourly_rate ──┬──► compute_fare ──► Session.cost
/// Rate.daily_max ────┘
///
/// EVERY monetary value in the engine flows through this type.
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use valet_core::money::Money;
    ///
    /// let hourly = Money::from_minor(2000);
    /// assert_eq!(hourly.minor(), 2000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns the smaller of two amounts.
    ///
    /// ## Example
    /// ```rust
    /// use valet_core::money::Money;
    ///
    /// // The capped remainder tier: min(remaining × hourly, daily cap)
    /// let remainder = Money::from_minor(2000);
    /// let cap = Money::from_minor(10000);
    /// assert_eq!(remainder.min(cap), remainder);
    /// ```
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Multiplies money by a whole-unit count (hours, days).
    ///
    /// ## Example
    /// ```rust
    /// use valet_core::money::Money;
    ///
    /// let hourly = Money::from_minor(2000);
    /// assert_eq!(hourly.multiply_units(3).minor(), 6000);
    /// ```
    #[inline]
    pub const fn multiply_units(&self, units: i64) -> Self {
        Money(self.0 * units)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows the raw minor-unit amount.
///
/// ## Note
/// This is for logs and debugging. Currency formatting is a presentation
/// concern and belongs to the (out of scope) UI layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for hour/day counts).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, units: i64) -> Self {
        Money(self.0 * units)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(2000);
        assert_eq!(money.minor(), 2000);
    }

    #[test]
    fn test_display_is_raw_amount() {
        assert_eq!(format!("{}", Money::from_minor(12000)), "12000");
        assert_eq!(format!("{}", Money::zero()), "0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
    }

    #[test]
    fn test_min_picks_smaller() {
        let remainder = Money::from_minor(2000);
        let cap = Money::from_minor(10000);
        assert_eq!(remainder.min(cap), remainder);
        assert_eq!(cap.min(remainder), remainder);
        assert_eq!(cap.min(cap), cap);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());

        let positive = Money::from_minor(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
    }

    #[test]
    fn test_multiply_units() {
        let daily = Money::from_minor(10000);
        assert_eq!(daily.multiply_units(2).minor(), 20000);
    }
}
