//! Organization display-name and initials derivation.
//!
//! When a member secures their account, the organization's display name and
//! two-letter initials are written into the identity's profile metadata so
//! transactional emails can be branded. The derivation is pure: the same
//! organization name always produces the same initials.

use serde::{Deserialize, Serialize};

/// Branding metadata written to the auth provider on account setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgBranding {
    pub display_name: String,
    pub initials: String,
}

impl OrgBranding {
    /// Derives branding from an organization name.
    pub fn derive(org_name: &str) -> Self {
        let display_name = base_name(org_name).to_owned();
        let initials = initials(org_name);
        Self {
            display_name,
            initials,
        }
    }
}

/// Returns the organization's base name: everything before a " - "
/// delimiter, trimmed. `"Alpha Phi Omega - North Chapter"` → `"Alpha Phi
/// Omega"`.
pub fn base_name(org_name: &str) -> &str {
    org_name
        .split(" - ")
        .next()
        .unwrap_or(org_name)
        .trim()
}

/// Returns two-letter uppercase initials for an organization name.
///
/// Multi-word names use the first letter of the first two words; a
/// single-word name uses its first two letters. The base name (before any
/// " - " delimiter) is what gets abbreviated.
pub fn initials(org_name: &str) -> String {
    let base = base_name(org_name);
    let words: Vec<&str> = base.split_whitespace().collect();

    let raw: String = match words.as_slice() {
        [] => String::new(),
        [only] => only.chars().take(2).collect(),
        [first, second, ..] => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect(),
    };

    raw.to_uppercase()
}
