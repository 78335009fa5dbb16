//! # Error Types
//!
//! Domain-specific error types for valet-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  valet-core errors (this file)                                         │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── FareError        - Billing arithmetic failures (clock skew)       │
//! │                                                                         │
//! │  valet-engine errors (separate crate)                                  │
//! │  └── EngineError      - Business-rule rejections + invariant faults    │
//! │                                                                         │
//! │  Flow: ValidationError / FareError ──► EngineError ──► Caller          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (plate, field, timestamps)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., disallowed characters in a plate).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Fare Error
// =============================================================================

/// Billing arithmetic failures.
#[derive(Debug, Error)]
pub enum FareError {
    /// Check-out timestamp precedes check-in.
    ///
    /// ## When This Occurs
    /// Clock skew between the machine that stamped the check-in and the one
    /// performing the check-out. Surfaced to the caller, never silently
    /// clamped to zero - a negative stay is an operational fault worth
    /// seeing.
    #[error("check-out {check_out} is before check-in {check_in}")]
    InvalidDuration {
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "plate".to_string(),
        };
        assert_eq!(err.to_string(), "plate is required");

        let err = ValidationError::TooLong {
            field: "owner_name".to_string(),
            max: 255,
        };
        assert_eq!(err.to_string(), "owner_name must be at most 255 characters");
    }

    #[test]
    fn test_fare_error_message_carries_timestamps() {
        let check_in = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let err = FareError::InvalidDuration { check_in, check_out };
        let msg = err.to_string();
        assert!(msg.contains("before check-in"));
        assert!(msg.contains("2026-03-01 10:00:00"));
    }
}
