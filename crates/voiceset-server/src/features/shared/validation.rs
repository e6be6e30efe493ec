//! Shared validation utilities
//!
//! Common input validation for commands and queries. All required text
//! fields reject whitespace-only values.

use thiserror::Error;

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("Name is required and cannot be empty")]
    Required,

    #[error("Name must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },
}

/// Errors that can occur during transcript validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscriptValidationError {
    #[error("Transcript text is required and cannot be empty")]
    Required,
}

/// Errors that can occur during email validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("Email is required and cannot be empty")]
    Required,

    #[error("Email address is not valid")]
    InvalidFormat,
}

/// Validate a dataset name.
///
/// Must be non-empty after trimming and at most `max_length` characters.
pub fn validate_name(name: &str, max_length: usize) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required);
    }

    if name.len() > max_length {
        return Err(NameValidationError::TooLong { max_length });
    }

    Ok(())
}

/// Validate a sample transcript: any non-blank text is accepted.
pub fn validate_transcript(text: &str) -> Result<(), TranscriptValidationError> {
    if text.trim().is_empty() {
        return Err(TranscriptValidationError::Required);
    }
    Ok(())
}

/// Validate an email address.
///
/// Deliberately loose: one `@` with something on both sides. Real
/// verification happens by delivering mail, not by parsing.
pub fn validate_email(email: &str) -> Result<(), EmailValidationError> {
    if email.trim().is_empty() {
        return Err(EmailValidationError::Required);
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(EmailValidationError::InvalidFormat);
    }

    Ok(())
}
