//! Common validation utilities.

use validator::ValidationError;

/// Longest duration a single chore run can report (24 hours).
const MAX_REPORTED_MINUTES: i32 = 1440;

/// Largest points value accepted for an override.
const MAX_POINTS: i32 = 10_000;

/// Largest cash amount accepted for an override (in cents).
const MAX_CASH_CENTS: i64 = 1_000_000;

/// Validates that a reported duration is within range (1 to 1440 minutes).
pub fn validate_minutes(minutes: i32) -> Result<(), ValidationError> {
    if (1..=MAX_REPORTED_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        let mut err = ValidationError::new("minutes_range");
        err.message = Some("Minutes must be between 1 and 1440".into());
        Err(err)
    }
}

/// Validates that a points value is within range (0 to 10000).
///
/// Zero is allowed so a parent can explicitly award nothing.
pub fn validate_points(points: i32) -> Result<(), ValidationError> {
    if (0..=MAX_POINTS).contains(&points) {
        Ok(())
    } else {
        let mut err = ValidationError::new("points_range");
        err.message = Some("Points must be between 0 and 10000".into());
        Err(err)
    }
}

/// Validates that a cash amount in cents is within range (0 to 1000000).
pub fn validate_cash_cents(cents: i64) -> Result<(), ValidationError> {
    if (0..=MAX_CASH_CENTS).contains(&cents) {
        Ok(())
    } else {
        let mut err = ValidationError::new("cash_range");
        err.message = Some("Cash amount must be between 0 and 1000000 cents".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minutes tests
    #[test]
    fn test_validate_minutes() {
        assert!(validate_minutes(1).is_ok());
        assert!(validate_minutes(30).is_ok());
        assert!(validate_minutes(1440).is_ok());
    }

    #[test]
    fn test_validate_minutes_out_of_range() {
        assert!(validate_minutes(0).is_err());
        assert!(validate_minutes(-5).is_err());
        assert!(validate_minutes(1441).is_err());
    }

    #[test]
    fn test_validate_minutes_error_message() {
        let err = validate_minutes(0).unwrap_err();
        assert_eq!(err.code, "minutes_range");
        assert!(err.message.is_some());
    }

    // Points tests
    #[test]
    fn test_validate_points() {
        assert!(validate_points(0).is_ok());
        assert!(validate_points(10).is_ok());
        assert!(validate_points(10_000).is_ok());
    }

    #[test]
    fn test_validate_points_out_of_range() {
        assert!(validate_points(-1).is_err());
        assert!(validate_points(10_001).is_err());
    }

    // Cash tests
    #[test]
    fn test_validate_cash_cents() {
        assert!(validate_cash_cents(0).is_ok());
        assert!(validate_cash_cents(900).is_ok());
        assert!(validate_cash_cents(1_000_000).is_ok());
    }

    #[test]
    fn test_validate_cash_cents_out_of_range() {
        assert!(validate_cash_cents(-1).is_err());
        assert!(validate_cash_cents(1_000_001).is_err());
    }

    #[test]
    fn test_validate_cash_cents_error_code() {
        let err = validate_cash_cents(-1).unwrap_err();
        assert_eq!(err.code, "cash_range");
    }
}
