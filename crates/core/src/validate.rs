//! Per-field input validation.
//!
//! Validation failures are recoverable: the caller corrects the input and
//! retries. Each failure names the offending field and the constraint that
//! failed, so clients can render errors next to the right form field.

use serde::Serialize;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub constraint: &'static str,
}

impl FieldError {
    pub fn new(field: impl Into<String>, constraint: &'static str) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }
}

/// Accumulator for field-level checks over one request payload.
///
/// All checks run; the caller gets every failing field at once rather than
/// the first one.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, "required"));
        }
        self
    }

    pub fn require_max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.errors.push(FieldError::new(field, "max_length"));
        }
        self
    }

    pub fn require_positive(&mut self, field: &str, value: f64) -> &mut Self {
        if !(value > 0.0) || !value.is_finite() {
            self.errors.push(FieldError::new(field, "positive"));
        }
        self
    }

    pub fn require_non_negative(&mut self, field: &str, value: f64) -> &mut Self {
        if !(value >= 0.0) || !value.is_finite() {
            self.errors.push(FieldError::new(field, "non_negative"));
        }
        self
    }

    /// Consume the accumulator: `Ok(())` when every check passed.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_checks_yield_ok() {
        let mut v = Validator::new();
        v.require_non_empty("name", "Box A")
            .require_positive("amount", 12.5)
            .require_max_len("name", "Box A", 64);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn failures_report_field_and_constraint() {
        let mut v = Validator::new();
        v.require_non_empty("method", "  ")
            .require_positive("amount", 0.0);
        let errors = v.finish().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("method", "required"),
                FieldError::new("amount", "positive"),
            ]
        );
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        let mut v = Validator::new();
        v.require_positive("amount", f64::NAN);
        assert_eq!(v.finish().unwrap_err().len(), 1);
    }
}
