//! Sync audit recording
//!
//! Every title transfer invocation ends with exactly one immutable history
//! row. Counts and duration are stored at full precision; the details blob
//! is capped to the first ten individual errors to bound record size.
//! Artwork-only and reverse-scan runs are never recorded.

use romdock_types::{
    CatalogStore, NewHistoryRecord, OperationKind, Result, RunStatus, SyncProfile, TransferReport,
};
use tracing::debug;

/// Maximum number of individual errors persisted in the details blob
pub const MAX_DETAILED_ERRORS: usize = 10;

/// Writer of per-invocation audit rows
#[derive(Debug, Clone, Copy)]
pub struct AuditRecorder;

impl AuditRecorder {
    /// Append one history row for a completed transfer run
    pub fn record<C: CatalogStore>(
        catalog: &C,
        profile: &SyncProfile,
        operation: OperationKind,
        report: &TransferReport,
    ) -> Result<i64> {
        let status = if report.errors.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::Partial
        };

        let error_summary = (!report.errors.is_empty()).then(|| {
            format!(
                "{} error(s); first: {}",
                report.errors.len(),
                report.errors[0].error
            )
        });

        let details = (!report.errors.is_empty()).then(|| {
            let capped: Vec<_> = report.errors.iter().take(MAX_DETAILED_ERRORS).collect();
            serde_json::json!({
                "errors": capped,
                "truncated": report.errors.len() > MAX_DETAILED_ERRORS,
            })
        });

        let save_totals = report.saves.as_ref().map(|s| s.total());

        let id = catalog.record_history(&NewHistoryRecord {
            profile_id: profile.id.clone(),
            profile_name: profile.name.clone(),
            timestamp: chrono::Utc::now(),
            operation,
            rom_count: report.total,
            roms_synced: report.synced,
            roms_skipped: report.skipped,
            roms_errored: report.errored,
            saves_copied: save_totals.as_ref().map_or(0, |s| s.copied),
            saves_skipped: save_totals.as_ref().map_or(0, |s| s.skipped),
            bytes_moved: report.bytes_copied,
            duration_ms: report.duration.as_millis() as u64,
            status,
            error_summary,
            details,
        })?;

        debug!(
            "Recorded sync history row {id} for profile '{}' ({})",
            profile.id,
            status.as_str()
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use romdock_catalog::SqliteCatalog;
    use romdock_types::{ArtworkSettings, TitleError};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn profile() -> SyncProfile {
        SyncProfile {
            id: "steam-deck".to_string(),
            name: "Steam Deck".to_string(),
            firmware: Some("SteamOS".to_string()),
            enabled: true,
            base_path: "/media/deck".into(),
            system_mappings: BTreeMap::new(),
            artwork: ArtworkSettings::default(),
        }
    }

    fn report_with_errors(count: usize) -> TransferReport {
        let mut report = TransferReport::new(uuid::Uuid::new_v4(), count as u32 + 5);
        report.synced = 5;
        report.errored = count as u32;
        report.duration = Duration::from_millis(1234);
        for i in 0..count {
            report.errors.push(TitleError {
                title: format!("Title {i}"),
                error: format!("copy failed #{i}"),
            });
        }
        report
    }

    #[test]
    fn test_clean_run_records_success() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let report = report_with_errors(0);

        AuditRecorder::record(&catalog, &profile(), OperationKind::SyncAll, &report).unwrap();

        let rows = catalog.history(None, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, romdock_types::RunStatus::Success);
        assert!(rows[0].error_summary.is_none());
        assert!(rows[0].details.is_none());
        assert_eq!(rows[0].duration_ms, 1234);
    }

    #[test]
    fn test_details_blob_caps_at_ten_errors() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let report = report_with_errors(14);

        AuditRecorder::record(&catalog, &profile(), OperationKind::SyncSelected, &report).unwrap();

        let rows = catalog.history(None, None).unwrap();
        assert_eq!(rows[0].status, romdock_types::RunStatus::Partial);
        // Full count survives in the summary even though details are capped
        assert_eq!(rows[0].roms_errored, 14);

        let details = rows[0].details.as_ref().unwrap();
        assert_eq!(details["errors"].as_array().unwrap().len(), MAX_DETAILED_ERRORS);
        assert_eq!(details["truncated"], serde_json::json!(true));
    }
}
