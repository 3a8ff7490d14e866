//! Field checks that the derive attributes cannot express directly.

use std::borrow::Cow;

use validator::ValidationError;

pub const PHONE_MIN_LEN: usize = 7;
pub const PHONE_MAX_LEN: usize = 15;

/// Loose shape check: an `@` and a `.` somewhere in the address.
pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if email.contains('@') && email.contains('.') {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message(Cow::Borrowed("email must contain '@' and '.'")))
    }
}

/// Digits, spaces, `+` and `-` only, 7 to 15 characters long.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let len = phone.chars().count();
    if !(PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&len) {
        return Err(ValidationError::new("phone_length").with_message(Cow::Owned(format!(
            "phone must be between {} and {} characters",
            PHONE_MIN_LEN, PHONE_MAX_LEN
        ))));
    }
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '+' || c == '-')
    {
        return Err(ValidationError::new("phone_format").with_message(Cow::Borrowed(
            "phone may only contain digits, spaces, '+' and '-'",
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(validate_email_shape("a@b.co").is_ok());
        assert!(validate_email_shape("no-at-sign.com").is_err());
        assert!(validate_email_shape("user@localhost").is_err());
    }

    #[test]
    fn test_phone_format() {
        assert!(validate_phone("+1 555-1234").is_ok());
        assert!(validate_phone("3001234567").is_ok());

        let err = validate_phone("12-34a").unwrap_err();
        assert_eq!(err.code, "phone_length");

        let err = validate_phone("555-1234x").unwrap_err();
        assert_eq!(err.code, "phone_format");
    }

    #[test]
    fn test_phone_length_bounds() {
        assert!(validate_phone("1234567").is_ok());
        assert!(validate_phone("123456").is_err());
        assert!(validate_phone("123456789012345").is_ok());
        assert!(validate_phone("1234567890123456").is_err());
    }
}
