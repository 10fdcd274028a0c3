//! Report and progress types for engine invocations
//!
//! Every engine invocation completes with a structured report rather than a
//! thrown error; only pre-flight fatal conditions surface as `Err`. Reports
//! are serializable so the CLI can emit them as JSON and the audit recorder
//! can persist their error lists.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One per-title error entry in a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleError {
    /// Display name of the title
    pub title: String,
    /// Error message
    pub error: String,
}

/// One per-save-file error entry in a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveError {
    /// Filename of the save
    pub save: String,
    /// Error message
    pub error: String,
}

/// One per-path error entry in an import report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportError {
    /// Device path that failed to import
    pub path: PathBuf,
    /// Error message
    pub error: String,
}

/// Result of a title transfer engine invocation.
///
/// `synced + skipped + errored == total` always holds on completion. Titles
/// with no folder mapping count as skipped and additionally carry an entry
/// in `errors`; `errored` counts copy failures only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReport {
    /// Invocation identifier
    pub run_id: uuid::Uuid,
    /// Number of titles considered
    pub total: u32,
    /// Number of titles copied
    pub synced: u32,
    /// Number of titles skipped (already present by size, or unmapped)
    pub skipped: u32,
    /// Number of titles whose copy failed
    pub errored: u32,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Per-title errors, in processing order
    pub errors: Vec<TitleError>,
    /// Aggregated save reconciliation outcome, when save sync ran
    pub saves: Option<SaveSyncReport>,
    /// Wall-clock duration of the invocation
    pub duration: Duration,
}

impl TransferReport {
    /// Create an empty report for a batch of the given size
    pub fn new(run_id: uuid::Uuid, total: u32) -> Self {
        Self {
            run_id,
            total,
            synced: 0,
            skipped: 0,
            errored: 0,
            bytes_copied: 0,
            errors: Vec::new(),
            saves: None,
            duration: Duration::default(),
        }
    }

    /// Whether every title processed without error
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of one direction of a save reconciliation pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavePassReport {
    /// Number of save files copied
    pub copied: u32,
    /// Number of save files skipped
    pub skipped: u32,
    /// Per-save errors
    pub errors: Vec<SaveError>,
}

impl SavePassReport {
    /// Merge another pass outcome into this one
    pub fn merge(&mut self, other: &SavePassReport) {
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.errors.extend(other.errors.iter().cloned());
    }
}

/// Outcome of a two-way save reconciliation for one or more titles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveSyncReport {
    /// To-device pass outcome
    pub to_device: SavePassReport,
    /// From-device pass outcome
    pub from_device: SavePassReport,
}

impl SaveSyncReport {
    /// Combined totals over both directions
    pub fn total(&self) -> SavePassReport {
        let mut total = self.to_device.clone();
        total.merge(&self.from_device);
        total
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: &SaveSyncReport) {
        self.to_device.merge(&other.to_device);
        self.from_device.merge(&other.from_device);
    }
}

/// Result of an artwork sync invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtworkReport {
    /// Number of titles considered
    pub total: u32,
    /// Number of artwork files copied
    pub copied: u32,
    /// Number of artwork files skipped (no cached variant, or unmapped system)
    pub skipped: u32,
    /// Per-title errors
    pub errors: Vec<TitleError>,
}

/// A device-resident file not yet present in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTitle {
    /// Display name derived from the filename
    pub name: String,
    /// Filename including extension
    pub filename: String,
    /// Absolute path on the device
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercase extension, with leading dot
    pub extension: String,
    /// System tag inferred from the profile's mapping key
    pub system: String,
}

/// Result of an import-from-device invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Number of paths considered
    pub total: u32,
    /// Number of titles created
    pub imported: u32,
    /// Number of paths skipped as already cataloged
    pub skipped: u32,
    /// Per-path errors
    pub errors: Vec<ImportError>,
    /// Outcome of the from-device save pull for the imported titles
    pub saves: SavePassReport,
}

/// Outcome of a profile reachability check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCheck {
    /// Whether the profile can be synced to
    pub valid: bool,
    /// Reason when invalid
    pub message: Option<String>,
}

/// Catalog-wide sync tally
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LibraryStatus {
    /// Titles in the catalog
    pub total: u64,
    /// Titles with the synced flag set
    pub synced: u64,
    /// Titles never synced
    pub unsynced: u64,
}

/// Per-title outcome reported through the progress sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// The title file was copied
    Copied,
    /// The title file already matched by size, or had no mapping
    Skipped,
    /// The copy failed
    Errored,
}

/// Progress event emitted after each title, exactly once per title.
///
/// Events arrive in a stable, monotonically increasing order; `index` is
/// 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 1-based position within the batch
    pub index: u32,
    /// Batch size
    pub total: u32,
    /// Display name of the title
    pub title: String,
    /// System tag of the title
    pub system: String,
    /// Outcome for this title
    pub status: TransferStatus,
    /// Resolved device path, when the system was mapped
    pub target_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_report_counts() {
        let mut report = TransferReport::new(uuid::Uuid::new_v4(), 3);
        report.synced = 1;
        report.skipped = 1;
        report.errored = 1;
        report.errors.push(TitleError {
            title: "B".to_string(),
            error: "No folder mapping for system: Unknown".to_string(),
        });

        assert_eq!(report.synced + report.skipped + report.errored, report.total);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_save_report_totals() {
        let report = SaveSyncReport {
            to_device: SavePassReport {
                copied: 2,
                skipped: 1,
                errors: vec![],
            },
            from_device: SavePassReport {
                copied: 0,
                skipped: 3,
                errors: vec![SaveError {
                    save: "game.srm".to_string(),
                    error: "permission denied".to_string(),
                }],
            },
        };

        let total = report.total();
        assert_eq!(total.copied, 2);
        assert_eq!(total.skipped, 4);
        assert_eq!(total.errors.len(), 1);
    }
}
