//! Form validation rules.
//!
//! These are the rules the storefront forms enforced before talking to the
//! backend (password length, phone digits, required fields). Handlers run them
//! server-side so a malformed request never leaves the storefront.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::EmailError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 8;
/// Maximum number of digits in a phone number.
pub const MAX_PHONE_DIGITS: usize = 14;

/// A form rule that failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(String),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("phone number must be between {min} and {max} digits")]
    InvalidPhone { min: usize, max: usize },
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("end date must be after start date")]
    InvalidDateRange,
    #[error("select at least one {0}")]
    EmptySelection(String),
    #[error("{0}")]
    Invalid(String),
}

/// Require a non-blank value.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] naming `field` when blank.
pub fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field.to_string()));
    }
    Ok(())
}

/// Passwords must be at least [`MIN_PASSWORD_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordTooShort`].
pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Phone numbers carry 8 to 14 digits.
///
/// A leading `+` and spaces, dashes, dots or parentheses are accepted as
/// formatting; any other character is rejected.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPhone`].
pub fn phone(value: &str) -> Result<(), ValidationError> {
    let invalid = ValidationError::InvalidPhone {
        min: MIN_PHONE_DIGITS,
        max: MAX_PHONE_DIGITS,
    };
    let trimmed = value.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut digits = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(invalid),
        }
    }

    if (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        Ok(())
    } else {
        Err(invalid)
    }
}

/// Line quantities start at 1.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidQuantity`] for zero.
pub const fn quantity(value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidQuantity);
    }
    Ok(())
}

/// A promotion window must end after it starts.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDateRange`].
pub fn date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::InvalidDateRange);
    }
    Ok(())
}
