//! Field validators for getVolunteer request payloads
//!
//! Each function has the signature expected by `#[validate(custom = "...")]`
//! so request structs can reference them directly.

use std::borrow::Cow;

use validator::ValidationError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// bcrypt only considers the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Reject empty or whitespace-only text
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(error(
            "password_too_short",
            "Password must be at least 8 characters",
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(error(
            "password_too_long",
            "Password must be at most 72 bytes",
        ));
    }
    Ok(())
}

/// Validate a phone number loosely: digits with common separators
/// Accepts: +1 (555) 010-0199, 555.010.0199, 0812345678
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.');
    if !phone.chars().all(allowed) {
        return Err(error(
            "invalid_phone",
            "Phone number may only contain digits, spaces and + - ( ) .",
        ));
    }

    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        return Err(error(
            "invalid_phone",
            "Phone number must contain between 7 and 15 digits",
        ));
    }

    if phone.rfind('+').is_some_and(|idx| idx != 0) {
        return Err(error(
            "invalid_phone",
            "A '+' is only allowed as the first character",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Ana").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(validate_password("s3cretpw").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(72)).is_ok());
        assert!(validate_password(&"a".repeat(73)).is_err());
    }

    #[test]
    fn test_password_error_code() {
        let err = validate_password("abc").unwrap_err();
        assert_eq!(err.code, "password_too_short");
        assert!(err.message.is_some());
    }

    #[test]
    fn test_phone_valid() {
        assert!(validate_phone("+1 (555) 010-0199").is_ok());
        assert!(validate_phone("555.010.0199").is_ok());
        assert!(validate_phone("0812345678").is_ok());
    }

    #[test]
    fn test_phone_invalid() {
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("555+0100199").is_err());
    }
}
