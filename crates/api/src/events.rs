//! Event sink that writes committed ledger changes to the log.

use koperasi_core::events::{LedgerEvent, LedgerEventSink};
use tracing::info;

/// Logs every ledger event at `info` under the `koperasi::ledger_events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl LedgerEventSink for TracingEventSink {
    fn publish(&self, event: &LedgerEvent) {
        info!(
            target: "koperasi::ledger_events",
            event = event.kind.name(),
            tenant_id = %event.tenant_id,
            koperasi_id = %event.koperasi_id,
            actor = %event.actor,
            occurred_at = %event.occurred_at,
            "Ledger event"
        );
    }
}
