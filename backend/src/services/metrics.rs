use std::sync::Arc;

use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge, CounterVec, Gauge};
use tracing::{info, warn};

use crate::services::active_window::ActiveWindow;
use crate::store::{RecordStore, ANNOUNCEMENTS};

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref OPERATIONS_COUNTER: CounterVec = register_counter_vec!(
        "announcement_operations_total",
        "Announcement operations by operation and outcome",
        &["operation", "outcome"]
    ).unwrap();

    // ── Store snapshot ──────────────────────────────────────────────────────
    pub static ref STORED_GAUGE: Gauge = register_gauge!(
        "announcements_stored_total",
        "Announcements currently stored"
    ).unwrap();

    pub static ref ACTIVE_GAUGE: Gauge = register_gauge!(
        "announcements_active_total",
        "Announcements inside their active window"
    ).unwrap();
}

pub fn record(operation: &str, outcome: &str) {
    OPERATIONS_COUNTER
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Spawn the background snapshot collector (refreshes every 5 minutes).
pub fn start(store: Arc<dyn RecordStore>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = collect(store.as_ref()).await {
                warn!("Metrics: collection failed: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
        }
    });
}

async fn collect(store: &dyn RecordStore) -> anyhow::Result<()> {
    let records = store.find_all(ANNOUNCEMENTS).await?;
    let now = Utc::now();
    let active = records
        .iter()
        .filter(|doc| ActiveWindow::of_document(doc).is_active(now))
        .count();

    STORED_GAUGE.set(records.len() as f64);
    ACTIVE_GAUGE.set(active as f64);

    info!("Metrics: {} announcement(s) stored, {} active", records.len(), active);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_increments_counter() {
        let before = OPERATIONS_COUNTER
            .with_label_values(&["metrics_test", "ok"])
            .get();
        record("metrics_test", "ok");
        let after = OPERATIONS_COUNTER
            .with_label_values(&["metrics_test", "ok"])
            .get();
        assert_eq!(after, before + 1.0);
    }
}
