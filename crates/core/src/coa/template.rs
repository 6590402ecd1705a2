//! Default chart of accounts for a new koperasi.
//!
//! Codes follow the usual `category-number` layout (`1-1000` is the first
//! asset account). Headers come before their children so the list can be
//! inserted in order.

use crate::coa::types::AccountCategory::{self, Aset, Beban, Ekuitas, Kewajiban, Pendapatan};

/// One account of the default chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateAccount {
    /// Account code.
    pub code: &'static str,
    /// Account name.
    pub name: &'static str,
    /// Category.
    pub category: AccountCategory,
    /// Code of the parent header account.
    pub parent_code: Option<&'static str>,
}

const fn header(
    code: &'static str,
    name: &'static str,
    category: AccountCategory,
) -> TemplateAccount {
    TemplateAccount {
        code,
        name,
        category,
        parent_code: None,
    }
}

const fn child(
    code: &'static str,
    name: &'static str,
    category: AccountCategory,
    parent: &'static str,
) -> TemplateAccount {
    TemplateAccount {
        code,
        name,
        category,
        parent_code: Some(parent),
    }
}

const DEFAULT_CHART: &[TemplateAccount] = &[
    header("1", "Aset", Aset),
    child("1-1000", "Kas", Aset, "1"),
    child("1-1100", "Bank", Aset, "1"),
    child("1-1200", "Piutang Pinjaman Anggota", Aset, "1"),
    child("1-1300", "Piutang Usaha", Aset, "1"),
    child("1-1400", "Persediaan Barang Dagang", Aset, "1"),
    child("1-1500", "Perlengkapan", Aset, "1"),
    child("1-2000", "Peralatan", Aset, "1"),
    child("1-2100", "Akumulasi Penyusutan Peralatan", Aset, "1"),
    header("2", "Kewajiban", Kewajiban),
    child("2-1000", "Simpanan Sukarela Anggota", Kewajiban, "2"),
    child("2-1100", "Utang Usaha", Kewajiban, "2"),
    child("2-1200", "Utang Pajak", Kewajiban, "2"),
    child("2-1300", "Dana Bagian SHU", Kewajiban, "2"),
    header("3", "Ekuitas", Ekuitas),
    child("3-1000", "Simpanan Pokok", Ekuitas, "3"),
    child("3-1100", "Simpanan Wajib", Ekuitas, "3"),
    child("3-2000", "Cadangan", Ekuitas, "3"),
    child("3-3000", "Donasi / Hibah", Ekuitas, "3"),
    header("4", "Pendapatan", Pendapatan),
    child("4-1000", "Pendapatan Jasa Pinjaman", Pendapatan, "4"),
    child("4-1100", "Penjualan Barang", Pendapatan, "4"),
    child("4-1200", "Pendapatan Jasa Klinik", Pendapatan, "4"),
    child("4-1300", "Pendapatan Fee PPOB", Pendapatan, "4"),
    child("4-9000", "Pendapatan Lain-lain", Pendapatan, "4"),
    header("5", "Beban", Beban),
    child("5-1000", "Harga Pokok Penjualan", Beban, "5"),
    child("5-2000", "Beban Gaji", Beban, "5"),
    child("5-2100", "Beban Listrik dan Air", Beban, "5"),
    child("5-2200", "Beban Penyusutan", Beban, "5"),
    child("5-2300", "Beban Administrasi dan Umum", Beban, "5"),
    child("5-9000", "Beban Lain-lain", Beban, "5"),
];

/// Returns the default chart, headers first.
#[must_use]
pub fn default_chart() -> &'static [TemplateAccount] {
    DEFAULT_CHART
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::service::CoaService;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_valid_and_unique() {
        let mut seen = HashSet::new();
        for account in default_chart() {
            assert_eq!(CoaService::normalize_code(account.code).unwrap(), account.code);
            assert!(seen.insert(account.code), "duplicate code {}", account.code);
        }
    }

    #[test]
    fn test_parents_precede_children() {
        let mut seen = HashSet::new();
        for account in default_chart() {
            if let Some(parent) = account.parent_code {
                assert!(seen.contains(parent), "{} listed before {parent}", account.code);
            }
            seen.insert(account.code);
        }
    }

    #[test]
    fn test_code_prefix_matches_category() {
        for account in default_chart() {
            assert!(
                account.code.starts_with(account.category.code_prefix()),
                "{} is not a {} code",
                account.code,
                account.category
            );
        }
    }

    #[test]
    fn test_every_category_has_a_header() {
        for category in AccountCategory::ALL {
            assert!(
                default_chart()
                    .iter()
                    .any(|a| a.category == category && a.parent_code.is_none())
            );
        }
    }
}
