//! # Rate Lookup
//!
//! The pricing collaborator seam: the engine resolves a rate by vehicle
//! type at check-in and never writes rates.
//!
//! Rate administration (CRUD screens, persistence) is out of scope; the
//! in-memory [`RateBook`] covers embedded deployments and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use valet_core::{Money, Rate, RateId};

/// Read-only rate resolution by canonical vehicle type.
pub trait RateLookup: Send + Sync {
    /// Returns the rate for a vehicle type, if one is configured.
    fn rate_for(&self, vehicle_type: &str) -> Option<Rate>;
}

/// In-memory rate table keyed by vehicle type.
#[derive(Debug, Default)]
pub struct RateBook {
    rates: RwLock<HashMap<String, Rate>>,
}

impl RateBook {
    /// Creates an empty rate book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate, assigning the next id. Builder-style for setup code.
    ///
    /// ## Example
    /// ```rust
    /// use valet_engine::rates::{RateBook, RateLookup};
    /// use valet_core::Money;
    ///
    /// let book = RateBook::new()
    ///     .with_rate("motor", Money::from_minor(2000), Money::from_minor(10000))
    ///     .with_rate("mobil", Money::from_minor(5000), Money::from_minor(25000));
    ///
    /// assert!(book.rate_for("motor").is_some());
    /// assert!(book.rate_for("becak").is_none());
    /// ```
    pub fn with_rate(self, vehicle_type: &str, hourly: Money, daily_max: Money) -> Self {
        {
            let mut rates = self.rates.write().expect("rate book lock poisoned");
            let id = RateId(rates.len() as i64 + 1);
            rates.insert(
                vehicle_type.to_string(),
                Rate {
                    id,
                    vehicle_type: vehicle_type.to_string(),
                    hourly_rate: hourly,
                    daily_max_rate: daily_max,
                },
            );
        }
        self
    }
}

impl RateLookup for RateBook {
    fn rate_for(&self, vehicle_type: &str) -> Option<Rate> {
        self.rates
            .read()
            .expect("rate book lock poisoned")
            .get(vehicle_type)
            .cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_canonical_type() {
        let book = RateBook::new().with_rate(
            "motor",
            Money::from_minor(2000),
            Money::from_minor(10000),
        );

        let rate = book.rate_for("motor").unwrap();
        assert_eq!(rate.hourly_rate, Money::from_minor(2000));
        assert_eq!(rate.daily_max_rate, Money::from_minor(10000));
        assert!(book.rate_for("truck").is_none());
    }

    #[test]
    fn test_ids_are_sequential() {
        let book = RateBook::new()
            .with_rate("motor", Money::from_minor(2000), Money::from_minor(10000))
            .with_rate("truck", Money::from_minor(10000), Money::from_minor(50000));

        let motor = book.rate_for("motor").unwrap();
        let truck = book.rate_for("truck").unwrap();
        assert_ne!(motor.id, truck.id);
    }
}
