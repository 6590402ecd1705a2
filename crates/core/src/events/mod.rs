//! Notification hook for ledger changes.
//!
//! Repositories publish an event after the database transaction that made the
//! change has committed. Sinks are synchronous and infallible: a financial
//! transition never waits on, or fails because of, a listener.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use koperasi_shared::types::{AccountId, JournalEntryId, KoperasiId, TenantId, UserId};
use serde::Serialize;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEventKind {
    /// An account was added to the chart.
    AccountCreated {
        /// New account.
        account_id: AccountId,
        /// Its code.
        code: String,
    },
    /// An account was changed or deactivated.
    AccountUpdated {
        /// Changed account.
        account_id: AccountId,
        /// Its code.
        code: String,
    },
    /// A draft entry was recorded.
    JournalCreated {
        /// New entry.
        entry_id: JournalEntryId,
        /// Its number.
        entry_number: String,
    },
    /// A draft entry was posted.
    JournalPosted {
        /// Posted entry.
        entry_id: JournalEntryId,
        /// Its number.
        entry_number: String,
    },
    /// An entry was cancelled.
    JournalCancelled {
        /// Cancelled entry.
        entry_id: JournalEntryId,
        /// Its number.
        entry_number: String,
    },
}

impl LedgerEventKind {
    /// Dotted event name, e.g. `journal.posted`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AccountCreated { .. } => "account.created",
            Self::AccountUpdated { .. } => "account.updated",
            Self::JournalCreated { .. } => "journal.created",
            Self::JournalPosted { .. } => "journal.posted",
            Self::JournalCancelled { .. } => "journal.cancelled",
        }
    }
}

/// A committed ledger change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEvent {
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// Koperasi scope.
    pub koperasi_id: KoperasiId,
    /// User who made the change.
    pub actor: UserId,
    /// When the change committed.
    pub occurred_at: DateTime<Utc>,
    /// The change.
    pub kind: LedgerEventKind,
}

impl LedgerEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn now(
        tenant_id: TenantId,
        koperasi_id: KoperasiId,
        actor: UserId,
        kind: LedgerEventKind,
    ) -> Self {
        Self {
            tenant_id,
            koperasi_id,
            actor,
            occurred_at: Utc::now(),
            kind,
        }
    }
}

/// Receiver of committed ledger changes.
#[cfg_attr(test, mockall::automock)]
pub trait LedgerEventSink: Send + Sync {
    /// Handles one event. Must not block for long and must not panic.
    fn publish(&self, event: &LedgerEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl LedgerEventSink for NoopEventSink {
    fn publish(&self, _event: &LedgerEvent) {}
}

/// Shared handle to the configured sink.
#[derive(Clone)]
pub struct EventHook {
    sink: Arc<dyn LedgerEventSink>,
}

impl EventHook {
    /// Wraps a sink.
    pub fn new(sink: Arc<dyn LedgerEventSink>) -> Self {
        Self { sink }
    }

    /// A hook that publishes nowhere.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopEventSink))
    }

    /// Publishes one event.
    pub fn emit(&self, event: &LedgerEvent) {
        self.sink.publish(event);
    }
}

impl Default for EventHook {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for EventHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHook").finish_non_exhaustive()
    }
}
