//! Property-based tests for balance accumulation.

use chrono::{Duration, NaiveDate};
use koperasi_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::coa::types::NormalBalance;
use crate::journal::types::JournalStatus;
use crate::ledger::balance::{LedgerLine, accumulate};

fn arb_status() -> impl Strategy<Value = JournalStatus> {
    prop_oneof![
        Just(JournalStatus::Draft),
        Just(JournalStatus::Posted),
        Just(JournalStatus::Cancelled),
    ]
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

/// Balanced two-line entries between two fixed accounts.
fn arb_entries() -> impl Strategy<Value = Vec<(i64, JournalStatus, Decimal)>> {
    prop::collection::vec((0i64..365, arb_status(), arb_amount()), 0..30)
}

fn lines_for(
    entries: &[(i64, JournalStatus, Decimal)],
    debit_account: AccountId,
    credit_account: AccountId,
) -> Vec<LedgerLine> {
    entries
        .iter()
        .flat_map(|(offset, status, amount)| {
            let entry_date = base() + Duration::days(*offset);
            [
                LedgerLine {
                    account_id: debit_account,
                    entry_date,
                    status: *status,
                    debit: *amount,
                    credit: Decimal::ZERO,
                },
                LedgerLine {
                    account_id: credit_account,
                    entry_date,
                    status: *status,
                    debit: Decimal::ZERO,
                    credit: *amount,
                },
            ]
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Over balanced entries, total debits equal total credits at any date.
    #[test]
    fn prop_balanced_entries_keep_identity(entries in arb_entries(), as_of in 0i64..400) {
        let (a, b) = (AccountId::new(), AccountId::new());
        let totals = accumulate(lines_for(&entries, a, b), base() + Duration::days(as_of));

        let debit: Decimal = totals.values().map(|t| t.debit).sum();
        let credit: Decimal = totals.values().map(|t| t.credit).sum();
        prop_assert_eq!(debit, credit);
    }

    /// Only posted entries dated on or before the as-of date count.
    #[test]
    fn prop_only_posted_lines_count(entries in arb_entries(), as_of in 0i64..400) {
        let (a, b) = (AccountId::new(), AccountId::new());
        let cutoff = base() + Duration::days(as_of);
        let totals = accumulate(lines_for(&entries, a, b), cutoff);

        let expected: Decimal = entries
            .iter()
            .filter(|(offset, status, _)| {
                *status == JournalStatus::Posted && base() + Duration::days(*offset) <= cutoff
            })
            .map(|(_, _, amount)| *amount)
            .sum();

        let debit_side = totals.get(&a).map(|t| t.balance(NormalBalance::Debit)).unwrap_or_default();
        let credit_side = totals.get(&b).map(|t| t.balance(NormalBalance::Credit)).unwrap_or_default();
        prop_assert_eq!(debit_side, expected);
        prop_assert_eq!(credit_side, expected);
    }

    /// Cancelling any entry removes exactly its amount from the balance.
    #[test]
    fn prop_cancellation_is_excluded(entries in arb_entries(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!entries.is_empty());
        let (a, b) = (AccountId::new(), AccountId::new());
        let far = base() + Duration::days(1000);

        let mut posted = entries.clone();
        for e in &mut posted {
            e.1 = JournalStatus::Posted;
        }
        let before = accumulate(lines_for(&posted, a, b), far);

        let i = pick.index(posted.len());
        let cancelled_amount = posted[i].2;
        posted[i].1 = JournalStatus::Cancelled;
        let after = accumulate(lines_for(&posted, a, b), far);

        let debit_before = before.get(&a).map(|t| t.debit).unwrap_or_default();
        let debit_after = after.get(&a).map(|t| t.debit).unwrap_or_default();
        prop_assert_eq!(debit_before - debit_after, cancelled_amount);
    }
}
