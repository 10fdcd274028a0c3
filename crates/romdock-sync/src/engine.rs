//! Title transfer engine
//!
//! One-directional (library to device) copy loop over a batch of titles.
//! Titles are processed strictly sequentially in caller order; a progress
//! event fires exactly once per title. Copy necessity is decided by size
//! equality alone: a device file of the same byte size as the catalog
//! record is treated as already synced, with no timestamp or content
//! comparison. Per-title failures never abort the batch; fatal pre-flight
//! conditions abort before any file is touched and before any history row
//! is written.

use crate::history::AuditRecorder;
use crate::resolver::PathResolver;
use romdock_config::DataLayout;
use romdock_saves::SaveSyncEngine;
use romdock_types::{
    CatalogStore, Error, OperationKind, ProgressEvent, ProgressSink, Result, SaveSyncReport,
    SyncProfile, Title, TitleError, TitleUpdate, TransferReport, TransferStatus,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info, warn};

/// Options for a title transfer invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Run the two-way save reconciliation after each mapped title
    pub sync_saves: bool,
    /// Decide and count copies without touching the device or the catalog
    pub dry_run: bool,
    /// Operation kind recorded in the sync history
    pub operation: OperationKind,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            sync_saves: false,
            dry_run: false,
            operation: OperationKind::SyncAll,
        }
    }
}

impl TransferOptions {
    /// Options for syncing a caller-selected subset
    pub fn selected() -> Self {
        Self {
            operation: OperationKind::SyncSelected,
            ..Self::default()
        }
    }

    /// Enable per-title save reconciliation
    pub fn with_saves(mut self) -> Self {
        self.sync_saves = true;
        self
    }
}

/// Outcome of one title's copy decision
enum CopyOutcome {
    /// The file was copied (or would be, under dry run)
    Copied,
    /// A same-size file already exists at the target
    AlreadyPresent,
}

/// One-directional library-to-device transfer engine
#[derive(Debug)]
pub struct TransferEngine<'a, C: CatalogStore> {
    catalog: &'a C,
    layout: DataLayout,
}

impl<'a, C: CatalogStore> TransferEngine<'a, C> {
    /// Create an engine over the given catalog and local data layout
    pub fn new(catalog: &'a C, layout: DataLayout) -> Self {
        Self { catalog, layout }
    }

    /// Transfer a batch of titles to the profile's device.
    ///
    /// Titles are processed in the supplied order; for each title the
    /// title copy and, when enabled, the two-way save reconciliation
    /// complete before the next title begins. On completion
    /// `synced + skipped + errored == total` and one audit row has been
    /// recorded (dry runs are not recorded). The operation never deletes
    /// or modifies source files and is idempotent: re-running against an
    /// unchanged device produces only skips.
    pub async fn transfer_titles(
        &self,
        profile: &SyncProfile,
        titles: &[Title],
        options: &TransferOptions,
        sink: &dyn ProgressSink,
    ) -> Result<TransferReport> {
        PathResolver::preflight(profile).await?;

        let run_id = uuid::Uuid::new_v4();
        let started = Instant::now();
        let total = titles.len() as u32;
        let mut report = TransferReport::new(run_id, total);
        let mut saves = options.sync_saves.then(SaveSyncReport::default);
        let save_engine = SaveSyncEngine::new(self.catalog, self.layout.saves_dir());

        info!(
            "Starting transfer of {} title(s) to '{}' ({})",
            total,
            profile.name,
            profile.base_path.display()
        );

        for (position, title) in titles.iter().enumerate() {
            let index = position as u32 + 1;

            let folder = match PathResolver::resolve(profile, &title.system) {
                Ok(folder) => folder,
                Err(e) => {
                    debug!("Skipping '{}': {e}", title.name);
                    report.skipped += 1;
                    report.errors.push(TitleError {
                        title: title.name.clone(),
                        error: e.to_string(),
                    });
                    sink.report(&ProgressEvent {
                        index,
                        total,
                        title: title.name.clone(),
                        system: title.system.clone(),
                        status: TransferStatus::Skipped,
                        target_path: None,
                    });
                    continue;
                }
            };

            let target_dir = profile.base_path.join(folder);
            let target_path = target_dir.join(&title.filename);

            let status = match self
                .copy_title(title, &target_dir, &target_path, options.dry_run)
                .await
            {
                Ok(CopyOutcome::Copied) => {
                    report.synced += 1;
                    report.bytes_copied += title.size;
                    if !options.dry_run {
                        if let Err(e) = self
                            .catalog
                            .update_title(title.id, &TitleUpdate::synced_at(chrono::Utc::now()))
                        {
                            warn!("Failed to flag '{}' as synced: {e}", title.name);
                        }
                    }
                    TransferStatus::Copied
                }
                Ok(CopyOutcome::AlreadyPresent) => {
                    report.skipped += 1;
                    TransferStatus::Skipped
                }
                Err(e) => {
                    report.errored += 1;
                    report.errors.push(TitleError {
                        title: title.name.clone(),
                        error: e.to_string(),
                    });
                    TransferStatus::Errored
                }
            };

            if let Some(saves) = saves.as_mut() {
                if !options.dry_run {
                    let title_saves = save_engine
                        .sync_both_ways(title, &profile.base_path, folder)
                        .await;
                    saves.merge(&title_saves);
                }
            }

            sink.report(&ProgressEvent {
                index,
                total,
                title: title.name.clone(),
                system: title.system.clone(),
                status,
                target_path: Some(target_path),
            });
        }

        report.saves = saves;
        report.duration = started.elapsed();

        info!(
            "Transfer complete: {} synced, {} skipped, {} errored in {:?}",
            report.synced, report.skipped, report.errored, report.duration
        );

        if !options.dry_run {
            if let Err(e) = AuditRecorder::record(self.catalog, profile, options.operation, &report)
            {
                warn!("Failed to record sync history: {e}");
            }
        }

        Ok(report)
    }

    /// Copy one title file unless a same-size file is already present.
    async fn copy_title(
        &self,
        title: &Title,
        target_dir: &Path,
        target_path: &Path,
        dry_run: bool,
    ) -> Result<CopyOutcome> {
        if !dry_run {
            fs::create_dir_all(target_dir).await?;
        }

        // Size equality is the sole identity heuristic; same-size files are
        // treated as identical even if their content differs.
        if let Ok(existing) = fs::metadata(target_path).await {
            if existing.is_file() && existing.len() == title.size {
                debug!("Already present by size: {}", target_path.display());
                return Ok(CopyOutcome::AlreadyPresent);
            }
        }

        if dry_run {
            debug!(
                "DRY RUN: would copy {} -> {}",
                title.path.display(),
                target_path.display()
            );
            return Ok(CopyOutcome::Copied);
        }

        fs::copy(&title.path, target_path)
            .await
            .map_err(|e| Error::CopyFailed {
                source_path: title.path.clone(),
                destination: target_path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!(
            "Copied {} -> {}",
            title.path.display(),
            target_path.display()
        );
        Ok(CopyOutcome::Copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use romdock_catalog::SqliteCatalog;
    use romdock_types::{ArtworkSettings, NewTitle, NullProgress, TitleFilter};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        catalog: SqliteCatalog,
        layout: DataLayout,
        profile: SyncProfile,
        library: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let library = temp.path().join("library");
        let device = temp.path().join("device");
        std::fs::create_dir_all(&library).unwrap();
        std::fs::create_dir_all(&device).unwrap();

        let layout = DataLayout::new(temp.path().join("data"));
        layout.ensure().unwrap();

        let mut system_mappings = BTreeMap::new();
        system_mappings.insert(
            "Nintendo Entertainment System".to_string(),
            "FC".to_string(),
        );

        Fixture {
            catalog: SqliteCatalog::open_in_memory().unwrap(),
            layout,
            profile: SyncProfile {
                id: "miyoo-mini".to_string(),
                name: "Miyoo Mini Plus".to_string(),
                firmware: Some("OnionOS".to_string()),
                enabled: true,
                base_path: device,
                system_mappings,
                artwork: ArtworkSettings::default(),
            },
            library,
            _temp: temp,
        }
    }

    fn add_title(fixture: &Fixture, name: &str, system: &str, content: &[u8]) -> Title {
        let filename = format!("{name}.nes");
        let path = fixture.library.join(&filename);
        std::fs::write(&path, content).unwrap();

        let id = fixture
            .catalog
            .add_title(&NewTitle {
                name: name.to_string(),
                filename,
                path: path.clone(),
                size: content.len() as u64,
                extension: ".nes".to_string(),
                system: system.to_string(),
                date_added: chrono::Utc::now(),
            })
            .unwrap();
        fixture.catalog.title(id).unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_transfer_copies_and_flags_titles() {
        let fixture = fixture();
        let title = add_title(&fixture, "Metroid", "Nintendo Entertainment System", b"rom");
        let engine = TransferEngine::new(&fixture.catalog, fixture.layout.clone());

        let report = engine
            .transfer_titles(
                &fixture.profile,
                &[title.clone()],
                &TransferOptions::default(),
                &NullProgress,
            )
            .await
            .unwrap();

        assert_eq!(report.synced, 1);
        assert_eq!(report.bytes_copied, 3);
        assert!(fixture.profile.base_path.join("FC/Metroid.nes").exists());

        let updated = fixture.catalog.title(title.id).unwrap().unwrap();
        assert!(updated.synced);
        assert!(updated.last_synced.is_some());

        // One audit row per invocation
        let history = fixture.catalog.history(None, None).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].roms_synced, 1);
    }

    #[tokio::test]
    async fn test_second_run_skips_by_size() {
        let fixture = fixture();
        let title = add_title(&fixture, "Metroid", "Nintendo Entertainment System", b"rom");
        let engine = TransferEngine::new(&fixture.catalog, fixture.layout.clone());

        let first = engine
            .transfer_titles(
                &fixture.profile,
                std::slice::from_ref(&title),
                &TransferOptions::default(),
                &NullProgress,
            )
            .await
            .unwrap();
        assert_eq!(first.synced, 1);

        let second = engine
            .transfer_titles(
                &fixture.profile,
                &[title],
                &TransferOptions::default(),
                &NullProgress,
            )
            .await
            .unwrap();
        assert_eq!(second.synced, 0);
        assert_eq!(second.skipped, 1);
    }

    #[tokio::test]
    async fn test_unmapped_title_does_not_block_batch() {
        let fixture = fixture();
        let mapped = add_title(&fixture, "A", "Nintendo Entertainment System", b"aaaa");
        let unmapped = add_title(&fixture, "B", "Atari 2600", b"bbbb");
        let engine = TransferEngine::new(&fixture.catalog, fixture.layout.clone());

        let report = engine
            .transfer_titles(
                &fixture.profile,
                &[mapped, unmapped],
                &TransferOptions::default(),
                &NullProgress,
            )
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.synced, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errored, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].title, "B");
        assert!(report.errors[0].error.contains("No folder mapping"));
        assert_eq!(report.synced + report.skipped + report.errored, report.total);
    }

    #[tokio::test]
    async fn test_unreachable_root_aborts_before_history() {
        let fixture = fixture();
        let title = add_title(&fixture, "Metroid", "Nintendo Entertainment System", b"rom");
        let mut profile = fixture.profile.clone();
        profile.base_path = fixture.library.join("missing-device");
        let engine = TransferEngine::new(&fixture.catalog, fixture.layout.clone());

        let error = engine
            .transfer_titles(&profile, &[title], &TransferOptions::default(), &NullProgress)
            .await
            .unwrap_err();

        assert!(error.is_fatal());
        assert!(fixture.catalog.history(None, None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_progress_events_fire_once_per_title() {
        use std::sync::Mutex;

        let fixture = fixture();
        let a = add_title(&fixture, "A", "Nintendo Entertainment System", b"aaaa");
        let b = add_title(&fixture, "B", "Atari 2600", b"bbbb");
        let engine = TransferEngine::new(&fixture.catalog, fixture.layout.clone());

        let events: Mutex<Vec<(u32, TransferStatus)>> = Mutex::new(Vec::new());
        let sink = |event: &ProgressEvent| {
            events.lock().unwrap().push((event.index, event.status));
        };

        engine
            .transfer_titles(&fixture.profile, &[a, b], &TransferOptions::default(), &sink)
            .await
            .unwrap();

        let events = events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![(1, TransferStatus::Copied), (2, TransferStatus::Skipped)]
        );
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let fixture = fixture();
        let title = add_title(&fixture, "Metroid", "Nintendo Entertainment System", b"rom");
        let engine = TransferEngine::new(&fixture.catalog, fixture.layout.clone());

        let options = TransferOptions {
            dry_run: true,
            ..TransferOptions::default()
        };
        let report = engine
            .transfer_titles(&fixture.profile, &[title.clone()], &options, &NullProgress)
            .await
            .unwrap();

        assert_eq!(report.synced, 1);
        assert!(!fixture.profile.base_path.join("FC/Metroid.nes").exists());
        assert!(!fixture.catalog.title(title.id).unwrap().unwrap().synced);
        assert!(fixture.catalog.history(None, None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sources_survive_sync() {
        let fixture = fixture();
        let title = add_title(&fixture, "Metroid", "Nintendo Entertainment System", b"rom");
        let engine = TransferEngine::new(&fixture.catalog, fixture.layout.clone());

        engine
            .transfer_titles(
                &fixture.profile,
                &[title],
                &TransferOptions::default(),
                &NullProgress,
            )
            .await
            .unwrap();

        assert!(fixture.library.join("Metroid.nes").exists());
        assert_eq!(
            fixture
                .catalog
                .titles(&TitleFilter::default())
                .unwrap()
                .len(),
            1
        );
    }
}
