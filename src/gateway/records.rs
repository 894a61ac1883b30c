use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::tenant::TenantScope;

use super::TenantRecord;

/// Calendar entry for a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub org_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
}

impl TenantRecord for Event {
    type Draft = EventDraft;
    type Patch = EventPatch;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn org_id(&self) -> i64 {
        self.org_id
    }

    fn build(scope: TenantScope, draft: EventDraft) -> Self {
        Self {
            id: 0,
            org_id: scope.org_id(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            starts_at: draft.starts_at,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(starts_at) = patch.starts_at {
            self.starts_at = starts_at;
        }
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn resource_name() -> &'static str {
        "events"
    }
}

/// Dues payment, reimbursement or other ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceKind {
    Income,
    Expense,
}

impl FinanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceTransaction {
    pub id: i64,
    pub org_id: i64,
    pub kind: FinanceKind,
    pub amount: f64,
    pub memo: String,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FinanceTransactionDraft {
    pub kind: FinanceKind,
    pub amount: f64,
    pub memo: String,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct FinanceTransactionPatch {
    pub kind: Option<FinanceKind>,
    pub amount: Option<f64>,
    pub memo: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

impl TenantRecord for FinanceTransaction {
    type Draft = FinanceTransactionDraft;
    type Patch = FinanceTransactionPatch;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn org_id(&self) -> i64 {
        self.org_id
    }

    fn build(scope: TenantScope, draft: FinanceTransactionDraft) -> Self {
        Self {
            id: 0,
            org_id: scope.org_id(),
            kind: draft.kind,
            amount: draft.amount,
            memo: draft.memo,
            occurred_on: draft.occurred_on,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, patch: FinanceTransactionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(memo) = patch.memo {
            self.memo = memo;
        }
        if let Some(occurred_on) = patch.occurred_on {
            self.occurred_on = occurred_on;
        }
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn resource_name() -> &'static str {
        "finance_transactions"
    }
}

/// Recurring filing or requirement with a due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceTask {
    pub id: i64,
    pub org_id: i64,
    pub title: String,
    pub due_on: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ComplianceTaskDraft {
    pub title: String,
    pub due_on: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct ComplianceTaskPatch {
    pub title: Option<String>,
    pub due_on: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl TenantRecord for ComplianceTask {
    type Draft = ComplianceTaskDraft;
    type Patch = ComplianceTaskPatch;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn org_id(&self) -> i64 {
        self.org_id
    }

    fn build(scope: TenantScope, draft: ComplianceTaskDraft) -> Self {
        Self {
            id: 0,
            org_id: scope.org_id(),
            title: draft.title,
            due_on: draft.due_on,
            completed: false,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, patch: ComplianceTaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(due_on) = patch.due_on {
            self.due_on = due_on;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn resource_name() -> &'static str {
        "compliance_tasks"
    }
}

/// Stored file reference; the binary itself lives in external storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub org_id: i64,
    pub title: String,
    pub category: Option<String>,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub title: String,
    pub category: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub category: Option<Option<String>>,
}

impl TenantRecord for Document {
    type Draft = DocumentDraft;
    type Patch = DocumentPatch;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn org_id(&self) -> i64 {
        self.org_id
    }

    fn build(scope: TenantScope, draft: DocumentDraft) -> Self {
        Self {
            id: 0,
            org_id: scope.org_id(),
            title: draft.title,
            category: draft.category,
            url: draft.url,
            uploaded_at: Utc::now(),
        }
    }

    fn apply(&mut self, patch: DocumentPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn resource_name() -> &'static str {
        "documents"
    }
}

/// History entry for an outbound message. Append-only; patches are a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationLog {
    pub id: i64,
    pub org_id: i64,
    pub subject: String,
    pub recipient_count: usize,
    pub sent_by: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CommunicationLogDraft {
    pub subject: String,
    pub recipient_count: usize,
    pub sent_by: String,
}

impl TenantRecord for CommunicationLog {
    type Draft = CommunicationLogDraft;
    type Patch = ();

    fn record_id(&self) -> i64 {
        self.id
    }

    fn org_id(&self) -> i64 {
        self.org_id
    }

    fn build(scope: TenantScope, draft: CommunicationLogDraft) -> Self {
        Self {
            id: 0,
            org_id: scope.org_id(),
            subject: draft.subject,
            recipient_count: draft.recipient_count,
            sent_by: draft.sent_by,
            sent_at: Utc::now(),
        }
    }

    fn apply(&mut self, _patch: ()) {}

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn resource_name() -> &'static str {
        "communication_logs"
    }
}
