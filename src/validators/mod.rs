//! Input validation for the roster and account-setup forms. Each validator
//! returns the first failing rule; the configured password rules come from
//! [`CoreConfig`](crate::config::CoreConfig).

pub mod email;
pub mod name;
pub mod password;

pub use email::validate_email;
pub use name::validate_name;
pub use password::{validate_password, validate_password_with};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    EmailEmpty,
    EmailTooLong,
    EmailInvalidFormat,
    PasswordEmpty,
    PasswordTooShort(usize),
    PasswordTooLong(usize),
    NameEmpty,
    NameTooLong,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailEmpty => write!(f, "Email cannot be empty"),
            Self::EmailTooLong => write!(f, "Email is too long (max 254 characters)"),
            Self::EmailInvalidFormat => write!(f, "Invalid email format"),
            Self::PasswordEmpty => write!(f, "Password cannot be empty"),
            Self::PasswordTooShort(min) => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordTooLong(max) => {
                write!(f, "Password is too long (max {max} characters)")
            }
            Self::NameEmpty => write!(f, "Full name cannot be empty"),
            Self::NameTooLong => write!(f, "Full name is too long (max 100 characters)"),
        }
    }
}

impl std::error::Error for ValidationError {}
