use crate::config::PasswordRules;

use super::ValidationError;

/// Validates a password against the given length rules.
pub fn validate_password_with(password: &str, rules: PasswordRules) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }

    if password.len() < rules.min_length {
        return Err(ValidationError::PasswordTooShort(rules.min_length));
    }

    if password.len() > rules.max_length {
        return Err(ValidationError::PasswordTooLong(rules.max_length));
    }

    Ok(())
}

/// Validates a password using the default product rule (8-128 characters).
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_password_with(password, PasswordRules::default())
}
