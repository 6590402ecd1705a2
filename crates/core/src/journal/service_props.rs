//! Property-based tests for journal entry validation.

use chrono::NaiveDate;
use koperasi_shared::types::{AccountId, KoperasiId, TenantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::journal::error::JournalError;
use crate::journal::service::JournalService;
use crate::journal::types::{JournalLineInput, LineAccount, NewJournalEntry};

/// Positive amounts with at most two decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_sides() -> impl Strategy<Value = (Vec<Decimal>, Vec<Decimal>)> {
    (
        prop::collection::vec(arb_amount(), 1..6),
        prop::collection::vec(arb_amount(), 1..6),
    )
}

fn entry(debits: &[Decimal], credits: &[Decimal], account: AccountId) -> NewJournalEntry {
    let lines = debits
        .iter()
        .map(|d| JournalLineInput::debit(account, *d))
        .chain(credits.iter().map(|c| JournalLineInput::credit(account, *c)))
        .collect();
    NewJournalEntry {
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        description: "Transaksi".to_string(),
        lines,
        source: None,
    }
}

fn validate(input: NewJournalEntry, account: AccountId) -> Result<(), JournalError> {
    let tenant_id = TenantId::new();
    let koperasi_id = KoperasiId::new();
    JournalService::validate(input, tenant_id, koperasi_id, |id| {
        Some(LineAccount {
            id,
            tenant_id,
            koperasi_id,
            code: "1-1000".to_string(),
            is_active: id == account,
        })
    })
    .map(|_| ())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// An entry is accepted exactly when its debits equal its credits.
    #[test]
    fn prop_accepted_iff_balanced((debits, credits) in arb_sides()) {
        let account = AccountId::new();
        let debit: Decimal = debits.iter().copied().sum();
        let credit: Decimal = credits.iter().copied().sum();

        let result = validate(entry(&debits, &credits, account), account);
        if debit == credit {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(JournalError::UnbalancedEntry { debit: d, credit: c, delta }) => {
                    prop_assert_eq!(d, debit);
                    prop_assert_eq!(c, credit);
                    prop_assert_eq!(delta, debit - credit);
                }
                other => prop_assert!(false, "Expected UnbalancedEntry, got {:?}", other),
            }
        }
    }

    /// Mirroring each debit with an equal credit always balances.
    #[test]
    fn prop_mirrored_entries_balance(debits in prop::collection::vec(arb_amount(), 1..8)) {
        let account = AccountId::new();
        prop_assert!(validate(entry(&debits, &debits, account), account).is_ok());
    }

    /// Validated totals equal the sum of the line amounts.
    #[test]
    fn prop_totals_match_lines(debits in prop::collection::vec(arb_amount(), 1..8)) {
        let tenant_id = TenantId::new();
        let koperasi_id = KoperasiId::new();
        let account = AccountId::new();
        let validated = JournalService::validate(
            entry(&debits, &debits, account),
            tenant_id,
            koperasi_id,
            |id| Some(LineAccount { id, tenant_id, koperasi_id, code: "1".into(), is_active: true }),
        ).unwrap();

        let expected: Decimal = debits.iter().copied().sum();
        prop_assert_eq!(validated.totals.debit, expected);
        prop_assert_eq!(validated.totals.credit, expected);
        prop_assert_eq!(validated.lines.len(), debits.len() * 2);
    }

    /// A line carrying both sides is rejected whatever the other lines are.
    #[test]
    fn prop_both_sides_rejected(a in arb_amount(), b in arb_amount()) {
        let rejected = matches!(
            JournalService::validate_line_amounts(1, a, b),
            Err(JournalError::BothSides { line: 1 })
        );
        prop_assert!(rejected);
    }

    /// Negative amounts are rejected on either side.
    #[test]
    fn prop_negative_rejected(a in arb_amount()) {
        prop_assert!(JournalService::validate_line_amounts(1, -a, Decimal::ZERO).is_err());
        prop_assert!(JournalService::validate_line_amounts(1, Decimal::ZERO, -a).is_err());
    }

    /// Amounts finer than cents are rejected.
    #[test]
    fn prop_sub_cent_rejected(mills in 1i64..1_000_000_000) {
        prop_assume!(mills % 10 != 0);
        let amount = Decimal::new(mills, 3);
        prop_assert!(
            matches!(
                JournalService::validate_line_amounts(1, amount, Decimal::ZERO),
                Err(JournalError::ExcessPrecision { .. })
            ),
            "sub-cent amount was accepted"
        );
    }
}
