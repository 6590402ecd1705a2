//! Journal entry validation.
//!
//! `JournalService::validate` turns a requested entry into a
//! [`ValidatedJournal`] or the first rule it breaks. Account data is supplied
//! through a lookup closure so the rules stay independent of storage.

use koperasi_shared::types::{AccountId, KoperasiId, TenantId};
use rust_decimal::Decimal;

use crate::journal::error::JournalError;
use crate::journal::types::{
    JournalTotals, LineAccount, NewJournalEntry, SourceRef, ValidatedJournal, ValidatedLine,
};

/// Minimum number of lines in an entry.
pub const MIN_LINES: usize = 2;
/// Decimal places kept for amounts.
pub const MONEY_SCALE: u32 = 2;
/// Exclusive upper bound for a line amount or an entry total (`NUMERIC(20, 2)`).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);
/// Longest accepted description.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Longest accepted line memo.
pub const MAX_MEMO_LEN: usize = 255;
/// Longest accepted source document id.
pub const MAX_SOURCE_ID_LEN: usize = 100;
/// Prefix of human readable entry numbers.
pub const ENTRY_NUMBER_PREFIX: &str = "JU";

/// Stateless service for journal entry validation.
pub struct JournalService;

impl JournalService {
    /// Validates a new journal entry for the given scope.
    ///
    /// Checks, in order: line count, description, source reference, then per
    /// line the amounts and the referenced account, and finally that total
    /// debits equal total credits.
    ///
    /// # Arguments
    /// * `input` - The requested entry
    /// * `tenant_id` / `koperasi_id` - Scope the entry is created in
    /// * `account_lookup` - Returns the account for an ID, `None` if unknown
    ///
    /// # Errors
    /// Returns the first violated rule; `UnbalancedEntry` carries the delta.
    pub fn validate<F>(
        input: NewJournalEntry,
        tenant_id: TenantId,
        koperasi_id: KoperasiId,
        account_lookup: F,
    ) -> Result<ValidatedJournal, JournalError>
    where
        F: Fn(AccountId) -> Option<LineAccount>,
    {
        if input.lines.len() < MIN_LINES {
            return Err(JournalError::InsufficientLines(input.lines.len()));
        }

        let description = Self::normalize_description(&input.description)?;
        let source = input.source.map(Self::normalize_source).transpose()?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for (index, line) in input.lines.into_iter().enumerate() {
            let line_no = index + 1;
            Self::validate_line_amounts(line_no, line.debit, line.credit)?;

            let account = account_lookup(line.account_id).ok_or(JournalError::AccountNotFound {
                line: line_no,
                account_id: line.account_id.into_inner(),
            })?;
            if account.tenant_id != tenant_id || account.koperasi_id != koperasi_id {
                return Err(JournalError::AccountOutOfScope {
                    line: line_no,
                    account_id: line.account_id.into_inner(),
                });
            }
            if !account.is_active {
                return Err(JournalError::AccountInactive {
                    line: line_no,
                    code: account.code,
                });
            }

            let memo = match line.memo.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(m) if m.chars().count() > MAX_MEMO_LEN => {
                    return Err(JournalError::MemoTooLong { line: line_no });
                }
                Some(m) => Some(m.to_string()),
            };

            lines.push(ValidatedLine {
                line_no: u32::try_from(line_no).unwrap_or(u32::MAX),
                account_id: line.account_id,
                debit: line.debit,
                credit: line.credit,
                memo,
            });
        }

        let totals = Self::totals(lines.iter().map(|l| (l.debit, l.credit)))?;
        Self::ensure_balanced(totals)?;

        Ok(ValidatedJournal {
            entry_date: input.entry_date,
            description,
            source,
            lines,
            totals,
        })
    }

    /// Checks one line's amounts: non-negative, exactly one side non-zero,
    /// below [`MAX_AMOUNT`], and no more than [`MONEY_SCALE`] decimal places.
    pub fn validate_line_amounts(
        line: usize,
        debit: Decimal,
        credit: Decimal,
    ) -> Result<(), JournalError> {
        if debit.is_sign_negative() && !debit.is_zero()
            || credit.is_sign_negative() && !credit.is_zero()
        {
            return Err(JournalError::NegativeAmount { line });
        }
        match (debit.is_zero(), credit.is_zero()) {
            (true, true) => return Err(JournalError::ZeroAmount { line }),
            (false, false) => return Err(JournalError::BothSides { line }),
            _ => {}
        }
        let amount = if debit.is_zero() { credit } else { debit };
        if amount >= MAX_AMOUNT {
            return Err(JournalError::AmountTooLarge {
                line,
                limit: MAX_AMOUNT,
            });
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(JournalError::ExcessPrecision {
                line,
                max_scale: MONEY_SCALE,
            });
        }
        Ok(())
    }

    /// Sums line amounts.
    ///
    /// # Errors
    /// Returns `TotalTooLarge` if either total reaches [`MAX_AMOUNT`].
    pub fn totals(
        amounts: impl IntoIterator<Item = (Decimal, Decimal)>,
    ) -> Result<JournalTotals, JournalError> {
        JournalTotals::from_amounts(amounts)
            .filter(|t| t.debit < MAX_AMOUNT && t.credit < MAX_AMOUNT)
            .ok_or(JournalError::TotalTooLarge(MAX_AMOUNT))
    }

    /// Fails with `UnbalancedEntry` unless debits equal credits exactly.
    pub fn ensure_balanced(totals: JournalTotals) -> Result<(), JournalError> {
        if totals.is_balanced() {
            Ok(())
        } else {
            Err(JournalError::unbalanced(totals.debit, totals.credit))
        }
    }

    /// Formats the human readable number for a sequence value.
    #[must_use]
    pub fn entry_number(sequence: i64) -> String {
        format!("{ENTRY_NUMBER_PREFIX}-{sequence:06}")
    }

    fn normalize_description(description: &str) -> Result<String, JournalError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(JournalError::InvalidDescription(
                "description is required".to_string(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(JournalError::InvalidDescription(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        Ok(description.to_string())
    }

    fn normalize_source(source: SourceRef) -> Result<SourceRef, JournalError> {
        let id = source.id.trim();
        if id.is_empty() || id.chars().count() > MAX_SOURCE_ID_LEN {
            return Err(JournalError::InvalidSource(format!(
                "source id must be 1 to {MAX_SOURCE_ID_LEN} characters"
            )));
        }
        Ok(SourceRef {
            kind: source.kind,
            id: id.to_string(),
        })
    }
}
