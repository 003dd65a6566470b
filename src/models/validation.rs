//! Synchronous form validation
//!
//! Checks run before any network call; failures are keyed by field name
//! using the wire field names so they line up with the form.

use crate::utils::errors::FieldErrors;

/// A form draft that can check itself before submission
pub trait Validate {
    fn validate(&self) -> FieldErrors;
}

/// Record `message` for `field` when `value` is blank
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

/// Record `message` for `field` when `value` is absent
pub fn require_some<T>(errors: &mut FieldErrors, field: &str, value: &Option<T>, message: &str) {
    if value.is_none() {
        errors.insert(field, message);
    }
}
