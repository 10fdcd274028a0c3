//! Two-way save reconciliation engine
//!
//! Saves are reconciled per title with a newer-wins rule evaluated
//! independently in each direction. Copies preserve the source file's
//! modification time, so a second pass over unchanged files produces only
//! skips. Discovery or setup failures are logged and treated as an empty
//! side; per-save errors are collected and never abort the remaining saves.

use crate::extensions::{save_extensions, save_type_label};
use chrono::{DateTime, Utc};
use filetime::FileTime;
use romdock_types::{
    CatalogStore, Error, NewSave, Result, SaveError, SavePassReport, SaveSyncReport,
    SyncDirection, Title, TitleId,
};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, warn};

/// Conventional save subdirectory names used by some firmwares
const SAVE_SUBDIRS: &[&str] = &["Saves", "saves", ".saves"];

/// One save file found on either side of the reconciliation
#[derive(Debug, Clone)]
pub struct SaveCandidate {
    /// Owning title
    pub title_id: TitleId,
    /// Save type label derived from the extension
    pub save_type: String,
    /// Filename, shared between both sides
    pub filename: String,
    /// Absolute path of this candidate
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Modification time, when the filesystem reports one
    pub modified: Option<SystemTime>,
}

/// Per-title two-way save synchronization engine
#[derive(Debug)]
pub struct SaveSyncEngine<'a, C: CatalogStore> {
    catalog: &'a C,
    saves_root: PathBuf,
}

impl<'a, C: CatalogStore> SaveSyncEngine<'a, C> {
    /// Create an engine over the given catalog and local save store root
    pub fn new(catalog: &'a C, saves_root: PathBuf) -> Self {
        Self {
            catalog,
            saves_root,
        }
    }

    /// Local save directory for one title
    pub fn local_save_dir(&self, title_id: TitleId) -> PathBuf {
        self.saves_root.join(title_id.to_string())
    }

    /// Enumerate the local save directory for a title.
    ///
    /// A missing directory is an empty result; read failures are logged and
    /// likewise yield an empty result.
    pub async fn scan_local_saves(&self, title: &Title) -> Vec<SaveCandidate> {
        let dir = self.local_save_dir(title.id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read local save dir {}: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut saves = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    let Ok(metadata) = entry.metadata().await else {
                        continue;
                    };
                    if !metadata.is_file() {
                        continue;
                    }
                    let filename = entry.file_name().to_string_lossy().into_owned();
                    let extension = path
                        .extension()
                        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                        .unwrap_or_default();
                    saves.push(SaveCandidate {
                        title_id: title.id,
                        save_type: save_type_label(&extension),
                        filename,
                        path,
                        size: metadata.len(),
                        modified: metadata.modified().ok(),
                    });
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Error while scanning {}: {e}", dir.display());
                    break;
                }
            }
        }
        saves
    }

    /// Probe the device for save files belonging to a title.
    ///
    /// Looks for `<title base name><known extension>` in the mapped system
    /// folder and in any conventional save subdirectory present there.
    pub async fn scan_device_saves(
        &self,
        title: &Title,
        device_root: &Path,
        system_folder: &str,
    ) -> Vec<SaveCandidate> {
        let rom_dir = device_root.join(system_folder);
        let base_name = title.base_name().to_string();
        let extensions = save_extensions(&title.system);
        debug!(
            "Scanning device saves for '{}' in {}",
            title.name,
            rom_dir.display()
        );

        let mut saves = probe_dir(&rom_dir, &base_name, &extensions, title.id).await;
        for subdir in SAVE_SUBDIRS {
            let dir = rom_dir.join(subdir);
            if dir_exists(&dir).await {
                saves.extend(probe_dir(&dir, &base_name, &extensions, title.id).await);
            }
        }
        saves
    }

    /// Copy local saves onto the device where the device side is missing or
    /// strictly older.
    ///
    /// Saves land in an existing `Saves` subdirectory when the firmware uses
    /// one, otherwise alongside the title file.
    pub async fn sync_to_device(
        &self,
        title: &Title,
        device_root: &Path,
        system_folder: &str,
    ) -> SavePassReport {
        let mut report = SavePassReport::default();

        let locals = self.scan_local_saves(title).await;
        if locals.is_empty() {
            return report;
        }

        let rom_dir = device_root.join(system_folder);
        let saves_dir = rom_dir.join("Saves");
        let target_dir = if dir_exists(&saves_dir).await {
            saves_dir
        } else {
            rom_dir
        };
        if let Err(e) = fs::create_dir_all(&target_dir).await {
            warn!(
                "Cannot prepare device save dir {}: {e}",
                target_dir.display()
            );
            return report;
        }

        for save in locals {
            let target = target_dir.join(&save.filename);
            match reconcile_copy(&save.path, &target, save.modified).await {
                Ok(Some(_bytes)) => {
                    report.copied += 1;
                    if let Err(e) = self.record_save(&save, None, Some(&target), SyncDirection::ToDevice)
                    {
                        report.errors.push(SaveError {
                            save: save.filename.clone(),
                            error: e.to_string(),
                        });
                    }
                }
                Ok(None) => report.skipped += 1,
                Err(e) => report.errors.push(SaveError {
                    save: save.filename.clone(),
                    error: e.to_string(),
                }),
            }
        }
        report
    }

    /// Copy device saves into local storage where the local side is missing
    /// or strictly older.
    pub async fn sync_from_device(
        &self,
        title: &Title,
        device_root: &Path,
        system_folder: &str,
    ) -> SavePassReport {
        let mut report = SavePassReport::default();

        let device_saves = self.scan_device_saves(title, device_root, system_folder).await;
        debug!(
            "Found {} device save(s) for '{}'",
            device_saves.len(),
            title.name
        );
        if device_saves.is_empty() {
            return report;
        }

        let local_dir = self.local_save_dir(title.id);
        if let Err(e) = fs::create_dir_all(&local_dir).await {
            warn!("Cannot prepare local save dir {}: {e}", local_dir.display());
            return report;
        }

        for save in device_saves {
            let local_path = local_dir.join(&save.filename);
            match reconcile_copy(&save.path, &local_path, save.modified).await {
                Ok(Some(_bytes)) => {
                    report.copied += 1;
                    if let Err(e) = self.record_save(
                        &save,
                        Some(&local_path),
                        Some(save.path.as_path()),
                        SyncDirection::FromDevice,
                    ) {
                        report.errors.push(SaveError {
                            save: save.filename.clone(),
                            error: e.to_string(),
                        });
                    }
                }
                Ok(None) => report.skipped += 1,
                Err(e) => report.errors.push(SaveError {
                    save: save.filename.clone(),
                    error: e.to_string(),
                }),
            }
        }
        report
    }

    /// Run both reconciliation passes for a title.
    ///
    /// Both passes always run; a save present and identical on both sides
    /// is evaluated twice and produces two skips.
    pub async fn sync_both_ways(
        &self,
        title: &Title,
        device_root: &Path,
        system_folder: &str,
    ) -> SaveSyncReport {
        debug!("Two-way save sync for '{}'", title.name);
        let to_device = self.sync_to_device(title, device_root, system_folder).await;
        let from_device = self
            .sync_from_device(title, device_root, system_folder)
            .await;
        SaveSyncReport {
            to_device,
            from_device,
        }
    }

    fn record_save(
        &self,
        save: &SaveCandidate,
        local_path: Option<&Path>,
        device_path: Option<&Path>,
        direction: SyncDirection,
    ) -> Result<()> {
        self.catalog.upsert_save(&NewSave {
            title_id: save.title_id,
            save_type: save.save_type.clone(),
            filename: save.filename.clone(),
            local_path: local_path.map(Path::to_path_buf),
            device_path: device_path.map(Path::to_path_buf),
            size: save.size,
            last_modified: save.modified.map(DateTime::<Utc>::from),
            last_synced: Some(Utc::now()),
            direction: Some(direction),
        })?;
        Ok(())
    }
}

async fn dir_exists(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn probe_dir(
    dir: &Path,
    base_name: &str,
    extensions: &[String],
    title_id: TitleId,
) -> Vec<SaveCandidate> {
    let mut saves = Vec::new();
    for extension in extensions {
        let filename = format!("{base_name}{extension}");
        let path = dir.join(&filename);
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {
                debug!("Found save file {} ({} bytes)", filename, metadata.len());
                saves.push(SaveCandidate {
                    title_id,
                    save_type: save_type_label(extension),
                    filename,
                    path,
                    size: metadata.len(),
                    modified: metadata.modified().ok(),
                });
            }
            _ => {}
        }
    }
    saves
}

/// Copy `source` over `destination` when the destination is missing or
/// strictly older, preserving the source modification time.
///
/// Returns the number of bytes copied, or `None` for a skip.
async fn reconcile_copy(
    source: &Path,
    destination: &Path,
    source_mtime: Option<SystemTime>,
) -> Result<Option<u64>> {
    let should_copy = match fs::metadata(destination).await {
        Ok(metadata) => {
            let dest_mtime = metadata.modified().ok();
            match (source_mtime, dest_mtime) {
                (Some(src), Some(dest)) => src > dest,
                // Without a comparable timestamp the existing file wins
                _ => false,
            }
        }
        Err(_) => true,
    };

    if !should_copy {
        return Ok(None);
    }

    let bytes = fs::copy(source, destination)
        .await
        .map_err(|e| Error::CopyFailed {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
            message: e.to_string(),
        })?;

    if let Some(mtime) = source_mtime {
        filetime::set_file_mtime(destination, FileTime::from_system_time(mtime))
            .map_err(Error::from)?;
    }

    debug!("Copied {} -> {}", source.display(), destination.display());
    Ok(Some(bytes))
}
