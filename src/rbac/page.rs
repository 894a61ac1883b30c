use serde::{Deserialize, Serialize};

/// The gated pages of the application.
///
/// These are the keys of the stored permission matrix. The string forms
/// match the page names as stored (`"Members"`, `"Events"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Members,
    Events,
    Documents,
    Compliance,
    Finances,
    History,
    Settings,
}

impl Page {
    /// Every gated page, for iteration.
    pub const ALL: [Page; 7] = [
        Page::Members,
        Page::Events,
        Page::Documents,
        Page::Compliance,
        Page::Finances,
        Page::History,
        Page::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Page::Members => "Members",
            Page::Events => "Events",
            Page::Documents => "Documents",
            Page::Compliance => "Compliance",
            Page::Finances => "Finances",
            Page::History => "History",
            Page::Settings => "Settings",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Members" => Some(Page::Members),
            "Events" => Some(Page::Events),
            "Documents" => Some(Page::Documents),
            "Compliance" => Some(Page::Compliance),
            "Finances" => Some(Page::Finances),
            "History" => Some(Page::History),
            "Settings" => Some(Page::Settings),
            _ => None,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell axis of the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudAction {
    Create,
    Read,
    Update,
    Delete,
}

impl CrudAction {
    pub const ALL: [CrudAction; 4] = [
        CrudAction::Create,
        CrudAction::Read,
        CrudAction::Update,
        CrudAction::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CrudAction::Create => "create",
            CrudAction::Read => "read",
            CrudAction::Update => "update",
            CrudAction::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(CrudAction::Create),
            "read" => Some(CrudAction::Read),
            "update" => Some(CrudAction::Update),
            "delete" => Some(CrudAction::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for CrudAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_roundtrip() {
        for page in Page::ALL {
            assert_eq!(Page::parse(page.as_str()), Some(page));
        }
        assert_eq!(Page::parse("Unknown"), None);
    }

    #[test]
    fn test_action_roundtrip() {
        for action in CrudAction::ALL {
            assert_eq!(CrudAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(CrudAction::parse("all"), None);
    }
}
