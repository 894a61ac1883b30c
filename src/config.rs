//! Central configuration for the chapterhouse core.
//!
//! All settings that would otherwise be hardcoded live here: password rules
//! for account activation, invitation expiry, token generation, and the page
//! the guard redirects to when a permission check fails.
//!
//! # Example
//!
//! ```rust
//! use chapterhouse::config::CoreConfig;
//! use chrono::Duration;
//!
//! // sensible defaults
//! let config = CoreConfig::default();
//!
//! // or customize
//! let config = CoreConfig {
//!     invitation_expiry: Duration::days(14),
//!     ..Default::default()
//! };
//! ```

use chrono::Duration;

/// Main configuration struct for the chapterhouse core.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Password rules applied when an account is secured.
    pub password: PasswordRules,

    /// How long an invitation token remains valid.
    ///
    /// Default: 7 days.
    pub invitation_expiry: Duration,

    /// Length of generated invitation tokens, in alphanumeric characters.
    ///
    /// Default is 32 (~190 bits of entropy).
    pub token_length: usize,

    /// Name of the landing page the guard redirects to on permission
    /// denial. This is a routing key for the embedding application, not a
    /// gated [`Page`](crate::rbac::Page).
    pub default_landing: &'static str,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            password: PasswordRules::default(),
            invitation_expiry: Duration::days(7),
            token_length: 32,
            default_landing: "overview",
        }
    }
}

impl CoreConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration suitable for development and testing.
    ///
    /// Longer invitation windows so seeded invites do not expire mid-test.
    pub fn development() -> Self {
        Self {
            invitation_expiry: Duration::days(30),
            ..Self::default()
        }
    }

    /// Configuration with stricter security settings.
    pub fn strict() -> Self {
        Self {
            password: PasswordRules {
                min_length: 12,
                max_length: 128,
            },
            invitation_expiry: Duration::days(3),
            token_length: 48,
            default_landing: "overview",
        }
    }
}

/// Length bounds for passwords submitted through the activation and
/// recovery flows.
///
/// The product rule is a minimum of 8 characters; there are no
/// character-class requirements.
#[derive(Debug, Clone, Copy)]
pub struct PasswordRules {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();

        assert_eq!(config.password.min_length, 8);
        assert_eq!(config.password.max_length, 128);
        assert_eq!(config.invitation_expiry, Duration::days(7));
        assert_eq!(config.token_length, 32);
        assert_eq!(config.default_landing, "overview");
    }

    #[test]
    fn test_strict_config() {
        let config = CoreConfig::strict();

        assert_eq!(config.password.min_length, 12);
        assert_eq!(config.invitation_expiry, Duration::days(3));
        assert_eq!(config.token_length, 48);
    }

    #[test]
    fn test_development_config() {
        let config = CoreConfig::development();

        assert_eq!(config.invitation_expiry, Duration::days(30));
        assert_eq!(config.password.min_length, 8);
    }
}
