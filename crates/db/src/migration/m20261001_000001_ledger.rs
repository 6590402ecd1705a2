//! Ledger schema migration.
//!
//! Creates the chart of accounts, journal entries, journal lines, the
//! per-koperasi entry number counter, and the triggers that keep stored
//! entries balanced and immutable once they leave draft.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(COA_ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 2: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_SEQUENCES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const COA_ACCOUNTS_SQL: &str = r"
CREATE TABLE coa_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    koperasi_id UUID NOT NULL,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(100) NOT NULL,
    category VARCHAR(20) NOT NULL,
    parent_id UUID REFERENCES coa_accounts(id) ON DELETE RESTRICT,
    description TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_coa_code UNIQUE (tenant_id, koperasi_id, code),
    CONSTRAINT chk_coa_category CHECK (
        category IN ('aset', 'kewajiban', 'ekuitas', 'pendapatan', 'beban')
    ),
    CONSTRAINT chk_coa_not_own_parent CHECK (parent_id IS NULL OR parent_id <> id)
);

CREATE INDEX idx_coa_scope_code ON coa_accounts(tenant_id, koperasi_id, code);
CREATE INDEX idx_coa_scope_category ON coa_accounts(tenant_id, koperasi_id, category);
CREATE INDEX idx_coa_parent ON coa_accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const JOURNAL_SEQUENCES_SQL: &str = r"
-- One counter row per koperasi; incremented with INSERT .. ON CONFLICT inside
-- the transaction that creates the entry.
CREATE TABLE journal_sequences (
    tenant_id UUID NOT NULL,
    koperasi_id UUID NOT NULL,
    last_value BIGINT NOT NULL DEFAULT 0,
    PRIMARY KEY (tenant_id, koperasi_id),
    CONSTRAINT chk_sequence_positive CHECK (last_value >= 0)
);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    koperasi_id UUID NOT NULL,
    entry_number VARCHAR(20) NOT NULL,
    entry_date DATE NOT NULL,
    description VARCHAR(500) NOT NULL,
    source_kind VARCHAR(20),
    source_id VARCHAR(100),
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    total_debit NUMERIC(20, 2) NOT NULL,
    total_credit NUMERIC(20, 2) NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    posted_by UUID,
    posted_at TIMESTAMPTZ,
    cancelled_by UUID,
    cancelled_at TIMESTAMPTZ,
    cancel_reason VARCHAR(500),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_journal_number UNIQUE (tenant_id, koperasi_id, entry_number),
    CONSTRAINT chk_journal_status CHECK (status IN ('draft', 'posted', 'cancelled')),
    CONSTRAINT chk_journal_balanced CHECK (total_debit = total_credit),
    CONSTRAINT chk_journal_source CHECK ((source_kind IS NULL) = (source_id IS NULL)),
    CONSTRAINT chk_journal_posted_audit CHECK (
        status <> 'posted' OR (posted_by IS NOT NULL AND posted_at IS NOT NULL)
    ),
    CONSTRAINT chk_journal_cancelled_audit CHECK (
        status <> 'cancelled' OR (cancelled_by IS NOT NULL AND cancelled_at IS NOT NULL)
    )
);

-- Listing order: date then id
CREATE INDEX idx_journal_scope_date ON journal_entries(tenant_id, koperasi_id, entry_date, id);
CREATE INDEX idx_journal_scope_status ON journal_entries(tenant_id, koperasi_id, status);
CREATE INDEX idx_journal_source ON journal_entries(source_kind, source_id)
    WHERE source_kind IS NOT NULL;
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE RESTRICT,
    account_id UUID NOT NULL REFERENCES coa_accounts(id) ON DELETE RESTRICT,
    line_no INTEGER NOT NULL,
    debit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    memo VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_journal_line_no UNIQUE (journal_entry_id, line_no),
    CONSTRAINT chk_line_no_positive CHECK (line_no >= 1),
    CONSTRAINT chk_line_one_side CHECK (
        debit >= 0 AND credit >= 0 AND ((debit > 0) <> (credit > 0))
    )
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(journal_entry_id, line_no);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_journal_balance
-- Lines of an entry must sum to equal debits and credits
-- ============================================================
CREATE OR REPLACE FUNCTION check_journal_balance()
RETURNS TRIGGER AS $$
DECLARE
    sum_debit NUMERIC(20, 2);
    sum_credit NUMERIC(20, 2);
BEGIN
    SELECT COALESCE(SUM(debit), 0), COALESCE(SUM(credit), 0)
    INTO sum_debit, sum_credit
    FROM journal_lines
    WHERE journal_entry_id = NEW.journal_entry_id;

    IF sum_debit <> sum_credit THEN
        RAISE EXCEPTION 'Journal entry is not balanced. Debit: %, Credit: %',
            sum_debit, sum_credit;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_journal_balance
AFTER INSERT ON journal_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_journal_balance();

-- ============================================================
-- FUNCTION: prevent_journal_delete_or_edit
-- Lines are written once with their entry; entries are never deleted
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_journal_delete_or_edit()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Journal records cannot be modified or deleted.';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_journal_delete_or_edit
BEFORE UPDATE OR DELETE ON journal_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_journal_delete_or_edit();

-- ============================================================
-- FUNCTION: guard_journal_status
-- draft -> posted | cancelled, posted -> cancelled, cancelled is final
-- ============================================================
CREATE OR REPLACE FUNCTION guard_journal_status()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status = 'cancelled' THEN
        RAISE EXCEPTION 'Cannot modify cancelled journal entry.';
    END IF;

    IF OLD.status = 'posted' AND NEW.status <> 'cancelled' THEN
        RAISE EXCEPTION 'Cannot modify posted journal entry. Cancel it and record a new one.';
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_guard_journal_status
BEFORE UPDATE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION guard_journal_status();

CREATE TRIGGER trg_prevent_journal_delete
BEFORE DELETE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_journal_delete_or_edit();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS journal_sequences CASCADE;
DROP TABLE IF EXISTS coa_accounts CASCADE;
DROP FUNCTION IF EXISTS check_journal_balance() CASCADE;
DROP FUNCTION IF EXISTS prevent_journal_delete_or_edit() CASCADE;
DROP FUNCTION IF EXISTS guard_journal_status() CASCADE;
";
