use std::sync::OnceLock;

use regex::Regex;

use super::ValidationError;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // pragmatic format check, not full RFC 5322
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Validates an email address for roster entry and sign-in.
///
/// Comparison elsewhere in the crate is case-insensitive; validation here
/// only checks shape and length.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if trimmed.len() > 254 {
        return Err(ValidationError::EmailTooLong);
    }

    if !email_re().is_match(trimmed) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("member@example.edu").is_ok());
        assert!(validate_email("first.last+tag@chapter.org").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
    }

    #[test]
    fn test_email_empty() {
        assert_eq!(validate_email("").unwrap_err(), ValidationError::EmailEmpty);
        assert_eq!(
            validate_email("   ").unwrap_err(),
            ValidationError::EmailEmpty
        );
    }

    #[test]
    fn test_email_invalid_format() {
        for bad in ["plainaddress", "missing@tld", "@no-local.com", "two @at.com"] {
            assert_eq!(
                validate_email(bad).unwrap_err(),
                ValidationError::EmailInvalidFormat,
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_email_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_email(&long).unwrap_err(),
            ValidationError::EmailTooLong
        );
    }
}
