//! Journal domain types.
//!
//! A journal entry (jurnal umum) is a dated set of lines whose debits equal
//! its credits. It is born `Draft`, becomes visible to balances when
//! `Posted`, and is retired by `Cancelled` without losing its lines.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use koperasi_shared::types::{AccountId, JournalEntryId, JournalLineId, KoperasiId, TenantId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Journal entry status.
///
/// The valid transitions are:
/// - Draft → Posted (post)
/// - Draft → Cancelled (cancel)
/// - Posted → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Recorded but not yet affecting balances.
    Draft,
    /// Committed to the ledger; counted in balances.
    Posted,
    /// Retired; kept for audit, excluded from balances.
    Cancelled,
}

impl JournalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if lines of an entry in this status count toward balances.
    #[must_use]
    pub const fn affects_balances(&self) -> bool {
        matches!(self, Self::Posted)
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of source document an entry was journalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Entered by hand.
    Manual,
    /// Retail sale.
    Penjualan,
    /// Purchase.
    Pembelian,
    /// Member savings.
    Simpanan,
    /// Member loan.
    Pinjaman,
    /// Bill payment / top-up settlement.
    Ppob,
    /// Clinic billing.
    Klinik,
    /// Payment gateway settlement.
    Pembayaran,
}

impl SourceKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Penjualan => "penjualan",
            Self::Pembelian => "pembelian",
            Self::Simpanan => "simpanan",
            Self::Pinjaman => "pinjaman",
            Self::Ppob => "ppob",
            Self::Klinik => "klinik",
            Self::Pembayaran => "pembayaran",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Some(Self::Manual),
            "penjualan" => Some(Self::Penjualan),
            "pembelian" => Some(Self::Pembelian),
            "simpanan" => Some(Self::Simpanan),
            "pinjaman" => Some(Self::Pinjaman),
            "ppob" => Some(Self::Ppob),
            "klinik" => Some(Self::Klinik),
            "pembayaran" => Some(Self::Pembayaran),
            _ => None,
        }
    }
}

/// Reference to the source document of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Document kind.
    pub kind: SourceKind,
    /// Document identifier in the originating module.
    pub id: String,
}

/// One requested line of a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineInput {
    /// Account to post against.
    pub account_id: AccountId,
    /// Debit amount (zero when the line is a credit).
    pub debit: Decimal,
    /// Credit amount (zero when the line is a debit).
    pub credit: Decimal,
    /// Optional line memo.
    pub memo: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    /// Transaction date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Lines.
    pub lines: Vec<JournalLineInput>,
    /// Source document reference.
    pub source: Option<SourceRef>,
}

/// What validation needs to know about an account referenced by a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAccount {
    /// Account ID.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning koperasi.
    pub koperasi_id: KoperasiId,
    /// Account code.
    pub code: String,
    /// Whether the account is active.
    pub is_active: bool,
}

/// A line that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    /// 1-based position within the entry.
    pub line_no: u32,
    /// Account.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Trimmed memo.
    pub memo: Option<String>,
}

/// A new entry that passed validation, ready to persist as a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedJournal {
    /// Transaction date.
    pub entry_date: NaiveDate,
    /// Trimmed description.
    pub description: String,
    /// Source document reference.
    pub source: Option<SourceRef>,
    /// Lines in input order.
    pub lines: Vec<ValidatedLine>,
    /// Debit and credit totals.
    pub totals: JournalTotals,
}

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl JournalTotals {
    /// Creates new totals.
    #[must_use]
    pub const fn new(debit: Decimal, credit: Decimal) -> Self {
        Self { debit, credit }
    }

    /// Sums `(debit, credit)` pairs, `None` if either sum overflows.
    #[must_use]
    pub fn from_amounts(amounts: impl IntoIterator<Item = (Decimal, Decimal)>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::default(), |acc, (debit, credit)| {
                Some(Self {
                    debit: acc.debit.checked_add(debit)?,
                    credit: acc.credit.checked_add(credit)?,
                })
            })
    }

    /// Returns true if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Returns `debit - credit`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A stored journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalLine {
    /// Line ID.
    pub id: JournalLineId,
    /// 1-based position within the entry.
    pub line_no: u32,
    /// Account.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub memo: Option<String>,
}

/// A stored journal entry with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning koperasi.
    pub koperasi_id: KoperasiId,
    /// Human readable sequential number, e.g. `JU-000042`.
    pub entry_number: String,
    /// Transaction date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Source document reference.
    pub source: Option<SourceRef>,
    /// Current status.
    pub status: JournalStatus,
    /// Debit and credit totals.
    pub totals: JournalTotals,
    /// Creator.
    pub created_by: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Poster.
    pub posted_by: Option<UserId>,
    /// Posting time.
    pub posted_at: Option<DateTime<Utc>>,
    /// Canceller.
    pub cancelled_by: Option<UserId>,
    /// Cancellation time.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Reason given on cancellation.
    pub cancel_reason: Option<String>,
    /// Lines, ordered by line number. Empty in listings.
    pub lines: Vec<JournalLine>,
}
