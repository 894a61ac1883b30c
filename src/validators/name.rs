use super::ValidationError;

const MAX_NAME_LENGTH: usize = 100;

/// Validates a member's full name as entered on the roster form or during
/// account setup. Whitespace-only input counts as empty.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("Jordan").is_ok());
        assert!(validate_name("Jordan Reyes").is_ok());
        assert!(validate_name("José García").is_ok());
    }

    #[test]
    fn test_name_empty() {
        assert_eq!(validate_name("").unwrap_err(), ValidationError::NameEmpty);
        assert_eq!(
            validate_name("   ").unwrap_err(),
            ValidationError::NameEmpty
        );
    }

    #[test]
    fn test_name_too_long() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(
            validate_name(&long).unwrap_err(),
            ValidationError::NameTooLong
        );
    }
}
