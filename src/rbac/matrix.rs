//! The stored per-member CRUD permission matrix.
//!
//! The matrix maps page names to four optional boolean cells. Defaults are
//! asymmetric and deliberate: a missing `read` cell grants viewing (opt-out),
//! while missing `create`/`update`/`delete` cells deny mutation (opt-in).
//! Privileged-role overrides live in the [evaluator](super::evaluator), not
//! here; the matrix is only the stored, non-privileged source of truth.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::page::{CrudAction, Page};

/// The four CRUD cells stored for one page.
///
/// `None` means "not explicitly configured" and falls back to the
/// asymmetric defaults; `Some(_)` is an explicit grant or denial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
}

impl CrudRecord {
    /// An explicit full-access record.
    pub fn full() -> Self {
        Self {
            create: Some(true),
            read: Some(true),
            update: Some(true),
            delete: Some(true),
        }
    }

    /// Effective permission for one action, applying the defaults:
    /// `read` missing ⇒ allowed, mutations missing ⇒ denied.
    pub fn allows(&self, action: CrudAction) -> bool {
        match action {
            CrudAction::Read => self.read.unwrap_or(true),
            CrudAction::Create => self.create.unwrap_or(false),
            CrudAction::Update => self.update.unwrap_or(false),
            CrudAction::Delete => self.delete.unwrap_or(false),
        }
    }

    fn cell_mut(&mut self, action: CrudAction) -> &mut Option<bool> {
        match action {
            CrudAction::Create => &mut self.create,
            CrudAction::Read => &mut self.read,
            CrudAction::Update => &mut self.update,
            CrudAction::Delete => &mut self.delete,
        }
    }

    /// Fills every unset cell with its effective default, so the record can
    /// be persisted as one complete four-cell write.
    fn materialized(mut self) -> Self {
        for action in CrudAction::ALL {
            let effective = self.allows(action);
            *self.cell_mut(action) = Some(effective);
        }
        self
    }
}

/// A member's stored permission matrix: page name → CRUD record.
///
/// Serializes to the stored JSON column format:
/// `{"Finances":{"read":false},"Events":{"create":true}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    pages: HashMap<Page, CrudRecord>,
}

impl PermissionMatrix {
    /// An empty matrix: every page readable, nothing mutable.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The stored record for a page, if one has been configured.
    pub fn record(&self, page: Page) -> Option<&CrudRecord> {
        self.pages.get(&page)
    }

    /// Effective permission for `page`/`action` under the stored matrix.
    ///
    /// A page with no record at all behaves like an empty record: readable,
    /// not mutable.
    pub fn allows(&self, page: Page, action: CrudAction) -> bool {
        self.pages
            .get(&page)
            .copied()
            .unwrap_or_default()
            .allows(action)
    }

    /// Sets one cell explicitly, materializing the page's full four-cell
    /// record so a persist writes the whole record at once.
    pub fn set(&mut self, page: Page, action: CrudAction, value: bool) {
        let mut record = self.pages.get(&page).copied().unwrap_or_default().materialized();
        *record.cell_mut(action) = Some(value);
        self.pages.insert(page, record);
    }

    /// Flips one cell to the inverse of its effective value. Returns the
    /// new value.
    pub fn toggle(&mut self, page: Page, action: CrudAction) -> bool {
        let next = !self.allows(page, action);
        self.set(page, action, next);
        next
    }

    /// Toggles all four cells of a page as a unit: if all four were
    /// effectively on, all four become off; otherwise all four become on.
    /// Returns the new shared value.
    pub fn toggle_all(&mut self, page: Page) -> bool {
        let all_on = CrudAction::ALL.iter().all(|a| self.allows(page, *a));
        let next = !all_on;
        self.pages.insert(
            page,
            CrudRecord {
                create: Some(next),
                read: Some(next),
                update: Some(next),
                delete: Some(next),
            },
        );
        next
    }

    /// Grants explicit full access to one page.
    pub fn grant_full(&mut self, page: Page) {
        self.pages.insert(page, CrudRecord::full());
    }

    /// Serializes to the stored JSON column format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Parses the stored JSON column format. Unknown page keys fail the
    /// parse rather than being silently dropped.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matrix_defaults() {
        let matrix = PermissionMatrix::new();
        for page in Page::ALL {
            assert!(matrix.allows(page, CrudAction::Read), "{page} read");
            assert!(!matrix.allows(page, CrudAction::Create), "{page} create");
            assert!(!matrix.allows(page, CrudAction::Update), "{page} update");
            assert!(!matrix.allows(page, CrudAction::Delete), "{page} delete");
        }
    }

    #[test]
    fn test_explicit_read_false_denies() {
        let mut matrix = PermissionMatrix::new();
        matrix.set(Page::Finances, CrudAction::Read, false);

        assert!(!matrix.allows(Page::Finances, CrudAction::Read));
        // other pages keep the implicit read grant
        assert!(matrix.allows(Page::Events, CrudAction::Read));
    }

    #[test]
    fn test_explicit_mutation_grant() {
        let mut matrix = PermissionMatrix::new();
        matrix.set(Page::Events, CrudAction::Create, true);

        assert!(matrix.allows(Page::Events, CrudAction::Create));
        assert!(!matrix.allows(Page::Events, CrudAction::Update));
        assert!(!matrix.allows(Page::Events, CrudAction::Delete));
    }

    #[test]
    fn test_set_materializes_full_record() {
        let mut matrix = PermissionMatrix::new();
        matrix.set(Page::Documents, CrudAction::Update, true);

        let record = matrix.record(Page::Documents).copied().unwrap();
        // every cell is explicit after one edit, so the row persists whole
        assert_eq!(record.read, Some(true));
        assert_eq!(record.create, Some(false));
        assert_eq!(record.update, Some(true));
        assert_eq!(record.delete, Some(false));
    }

    #[test]
    fn test_toggle() {
        let mut matrix = PermissionMatrix::new();

        assert!(!matrix.toggle(Page::Events, CrudAction::Read));
        assert!(!matrix.allows(Page::Events, CrudAction::Read));

        assert!(matrix.toggle(Page::Events, CrudAction::Read));
        assert!(matrix.allows(Page::Events, CrudAction::Read));
    }

    #[test]
    fn test_toggle_all_from_partial() {
        let mut matrix = PermissionMatrix::new();
        matrix.set(Page::Compliance, CrudAction::Create, true);

        // not all four on (update/delete are off) so toggling all turns all on
        assert!(matrix.toggle_all(Page::Compliance));
        for action in CrudAction::ALL {
            assert!(matrix.allows(Page::Compliance, action));
        }

        // all four on, so the next toggle turns all off
        assert!(!matrix.toggle_all(Page::Compliance));
        for action in CrudAction::ALL {
            assert!(!matrix.allows(Page::Compliance, action));
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let mut matrix = PermissionMatrix::new();
        matrix.set(Page::Finances, CrudAction::Read, false);
        matrix.grant_full(Page::Events);

        let json = matrix.to_json();
        let parsed = PermissionMatrix::from_json(&json).expect("should parse");

        assert_eq!(parsed, matrix);
        assert!(!parsed.allows(Page::Finances, CrudAction::Read));
        assert!(parsed.allows(Page::Events, CrudAction::Delete));
    }

    #[test]
    fn test_from_json_partial_record() {
        // the stored format may carry partial records written by older
        // clients; missing cells keep their defaults
        let parsed =
            PermissionMatrix::from_json(r#"{"Finances":{"read":false}}"#).expect("should parse");

        assert!(!parsed.allows(Page::Finances, CrudAction::Read));
        assert!(!parsed.allows(Page::Finances, CrudAction::Create));
        assert!(parsed.allows(Page::Members, CrudAction::Read));
    }

    #[test]
    fn test_from_json_unknown_page_fails() {
        assert!(PermissionMatrix::from_json(r#"{"Treasury":{"read":true}}"#).is_none());
    }
}
