//! # Validation Module
//!
//! Boundary validation for operator input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport handler (out of scope)                             │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Required-field presence                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Canonical plate normalization                                     │
//! │  └── Length / character-set rules                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine business rules                                        │
//! │  ├── Rate exists for vehicle type                                      │
//! │  ├── Area exists, is active, has capacity                              │
//! │  └── Vehicle not already parked                                        │
//! │                                                                         │
//! │  Defense in depth: each layer catches different errors                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Canonical Plate
//! Uniqueness of vehicles is on the *canonical* plate - trimmed, uppercased,
//! inner whitespace collapsed - never on raw operator input. "b 1234 xy",
//! " B 1234  XY " and "B 1234 XY" are the same vehicle.

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_OWNER_NAME_LEN, MAX_OWNER_PHONE_LEN, MAX_PLATE_LEN, MAX_VEHICLE_TYPE_LEN};

// =============================================================================
// Plate
// =============================================================================

/// Normalizes a license plate to its canonical form and validates it.
///
/// ## Rules
/// - trimmed, uppercased, runs of whitespace collapsed to one space
/// - must not be empty after trimming
/// - at most [`MAX_PLATE_LEN`] characters
/// - letters, digits, spaces and hyphens only
///
/// ## Example
/// ```rust
/// use valet_core::validation::normalize_plate;
///
/// assert_eq!(normalize_plate("  b 1234  xy ").unwrap(), "B 1234 XY");
/// assert!(normalize_plate("").is_err());
/// assert!(normalize_plate("PL@TE!").is_err());
/// ```
pub fn normalize_plate(raw: &str) -> ValidationResult<String> {
    let canonical = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    if canonical.is_empty() {
        return Err(ValidationError::Required {
            field: "plate".to_string(),
        });
    }

    if canonical.len() > MAX_PLATE_LEN {
        return Err(ValidationError::TooLong {
            field: "plate".to_string(),
            max: MAX_PLATE_LEN,
        });
    }

    if !canonical
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "plate".to_string(),
            reason: "must contain only letters, numbers, spaces, and hyphens".to_string(),
        });
    }

    Ok(canonical)
}

// =============================================================================
// Vehicle Type
// =============================================================================

/// Validates a vehicle type and returns its canonical (lowercase) form.
///
/// The rate book is keyed by this canonical form, so "Motor" and "motor"
/// resolve to the same rate.
pub fn normalize_vehicle_type(raw: &str) -> ValidationResult<String> {
    let canonical = raw.trim().to_lowercase();

    if canonical.is_empty() {
        return Err(ValidationError::Required {
            field: "vehicle_type".to_string(),
        });
    }

    if canonical.len() > MAX_VEHICLE_TYPE_LEN {
        return Err(ValidationError::TooLong {
            field: "vehicle_type".to_string(),
            max: MAX_VEHICLE_TYPE_LEN,
        });
    }

    Ok(canonical)
}

// =============================================================================
// Owner Fields
// =============================================================================

/// Validates an optional owner name.
///
/// Empty strings collapse to `None` so that "field left blank" and "field
/// absent" behave identically downstream (the non-destructive owner refresh
/// only applies *supplied* values).
pub fn validate_owner_name(raw: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(name) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if name.len() > MAX_OWNER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "owner_name".to_string(),
            max: MAX_OWNER_NAME_LEN,
        });
    }

    Ok(Some(name.to_string()))
}

/// Validates an optional owner phone number.
///
/// ## Rules
/// - at most [`MAX_OWNER_PHONE_LEN`] characters
/// - digits, `+`, `-`, and spaces only
pub fn validate_owner_phone(raw: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(phone) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if phone.len() > MAX_OWNER_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "owner_phone".to_string(),
            max: MAX_OWNER_PHONE_LEN,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "owner_phone".to_string(),
            reason: "must contain only digits, +, -, and spaces".to_string(),
        });
    }

    Ok(Some(phone.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_normalization() {
        assert_eq!(normalize_plate("b 1234 xy").unwrap(), "B 1234 XY");
        assert_eq!(normalize_plate("  B  1234   XY  ").unwrap(), "B 1234 XY");
        assert_eq!(normalize_plate("ab-123").unwrap(), "AB-123");
    }

    #[test]
    fn test_plate_rejects_empty_and_whitespace() {
        assert!(normalize_plate("").is_err());
        assert!(normalize_plate("   ").is_err());
    }

    #[test]
    fn test_plate_rejects_bad_characters() {
        let err = normalize_plate("PL@TE").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_plate_rejects_overlong() {
        let long = "A".repeat(MAX_PLATE_LEN + 1);
        assert!(matches!(
            normalize_plate(&long).unwrap_err(),
            ValidationError::TooLong { .. }
        ));
    }

    #[test]
    fn test_vehicle_type_lowercased() {
        assert_eq!(normalize_vehicle_type("Motor").unwrap(), "motor");
        assert_eq!(normalize_vehicle_type(" TRUCK ").unwrap(), "truck");
        assert!(normalize_vehicle_type("").is_err());
    }

    #[test]
    fn test_owner_name_blank_collapses_to_none() {
        assert_eq!(validate_owner_name(None).unwrap(), None);
        assert_eq!(validate_owner_name(Some("")).unwrap(), None);
        assert_eq!(validate_owner_name(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_owner_name(Some(" Budi ")).unwrap(),
            Some("Budi".to_string())
        );
    }

    #[test]
    fn test_owner_phone_rules() {
        assert_eq!(
            validate_owner_phone(Some("+62 812-3456")).unwrap(),
            Some("+62 812-3456".to_string())
        );
        assert!(validate_owner_phone(Some("call me")).is_err());
        assert_eq!(validate_owner_phone(Some("")).unwrap(), None);
    }
}
