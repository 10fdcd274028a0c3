//! Device reverse scanning and import
//!
//! Discovers titles that live on a device but not in the catalog, and
//! imports selected discoveries as new catalog records. Discovery is
//! non-recursive per mapped folder and infers the system tag from the
//! mapping key rather than re-detecting it from content. A folder missing
//! on the device is normal (unused system) and is skipped silently.

use crate::resolver::PathResolver;
use romdock_config::DataLayout;
use romdock_saves::SaveSyncEngine;
use romdock_types::{
    CandidateTitle, CatalogStore, Error, ImportError, ImportReport, NewTitle, Result, SyncProfile,
    Title,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Recognized title file extensions, lowercase with leading dot
pub const TITLE_EXTENSIONS: &[&str] = &[
    ".nes", ".smc", ".sfc", ".gb", ".gbc", ".gba", ".n64", ".z64", ".v64", ".nds", ".3ds", ".iso",
    ".cue", ".bin", ".gcm", ".cso", ".md", ".smd", ".gen", ".gg", ".sms", ".rom", ".zip", ".7z",
];

/// Reverse scanner over a profile's mapped device folders
#[derive(Debug)]
pub struct DeviceScanner<'a, C: CatalogStore> {
    catalog: &'a C,
    layout: DataLayout,
}

impl<'a, C: CatalogStore> DeviceScanner<'a, C> {
    /// Create a scanner over the given catalog and local data layout
    pub fn new(catalog: &'a C, layout: DataLayout) -> Self {
        Self { catalog, layout }
    }

    /// Titles present on the device but absent from the catalog.
    ///
    /// Lists files directly inside each mapped folder (non-recursive),
    /// keeps recognized title extensions, and drops paths the catalog
    /// already knows. Requires a configured, reachable device root.
    pub async fn scan_for_uncataloged(&self, profile: &SyncProfile) -> Result<Vec<CandidateTitle>> {
        if !profile.has_base_path() {
            return Err(Error::ProfileDisabled {
                id: profile.id.clone(),
            });
        }
        PathResolver::verify_root(profile).await?;

        let mut candidates = Vec::new();
        for (system, folder) in &profile.system_mappings {
            let dir = profile.base_path.join(folder);
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    // Devices commonly lack folders for unused systems
                    debug!("Skipping {} ({e})", dir.display());
                    continue;
                }
            };

            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                let Ok(metadata) = entry.metadata().await else {
                    continue;
                };
                if !metadata.is_file() {
                    continue;
                }

                let Some(extension) = lowercase_extension(&path) else {
                    continue;
                };
                if !TITLE_EXTENSIONS.contains(&extension.as_str()) {
                    continue;
                }
                if self.catalog.title_by_path(&path)?.is_some() {
                    continue;
                }

                let filename = entry.file_name().to_string_lossy().into_owned();
                let name = filename
                    .strip_suffix(extension.as_str())
                    .unwrap_or(&filename)
                    .to_string();
                candidates.push(CandidateTitle {
                    name,
                    filename,
                    path,
                    size: metadata.len(),
                    extension,
                    system: system.clone(),
                });
            }
        }

        info!(
            "Reverse scan of '{}' found {} uncataloged title(s)",
            profile.name,
            candidates.len()
        );
        Ok(candidates)
    }

    /// Import device-resident files as new catalog records.
    ///
    /// Paths already cataloged are duplicate-by-path skips. The system tag
    /// comes from whichever mapped folder contains the path. Each imported
    /// title gets a from-device-only save pull. Per-path errors are
    /// collected and never abort the batch.
    pub async fn import_candidates(
        &self,
        profile: &SyncProfile,
        paths: &[PathBuf],
    ) -> Result<ImportReport> {
        if !profile.has_base_path() {
            return Err(Error::ProfileDisabled {
                id: profile.id.clone(),
            });
        }
        PathResolver::verify_root(profile).await?;

        let save_engine = SaveSyncEngine::new(self.catalog, self.layout.saves_dir());
        let mut report = ImportReport {
            total: paths.len() as u32,
            ..ImportReport::default()
        };

        for path in paths {
            if self.catalog.title_by_path(path)?.is_some() {
                debug!("Already cataloged: {}", path.display());
                report.skipped += 1;
                continue;
            }

            let metadata = match fs::metadata(path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    report.errors.push(ImportError {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let Some((system, folder)) = infer_system(profile, path) else {
                report.errors.push(ImportError {
                    path: path.clone(),
                    error: "Path is not under any mapped folder".to_string(),
                });
                continue;
            };

            let extension = lowercase_extension(path).unwrap_or_default();
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = filename
                .strip_suffix(extension.as_str())
                .unwrap_or(&filename)
                .to_string();

            let new_title = NewTitle {
                name,
                filename,
                path: path.clone(),
                size: metadata.len(),
                extension,
                system: system.clone(),
                date_added: chrono::Utc::now(),
            };
            let id = match self.catalog.add_title(&new_title) {
                Ok(id) => id,
                Err(e) => {
                    report.errors.push(ImportError {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            report.imported += 1;
            info!("Imported '{}' from device as title {id}", new_title.name);

            // Pull any device saves for the freshly imported title
            let title = imported_title(id, &new_title);
            let pulled = save_engine
                .sync_from_device(&title, &profile.base_path, &folder)
                .await;
            report.saves.merge(&pulled);
        }

        Ok(report)
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Which mapped folder contains this device path, if any
fn infer_system(profile: &SyncProfile, path: &Path) -> Option<(String, String)> {
    profile
        .system_mappings
        .iter()
        .find(|(_, folder)| path.starts_with(profile.base_path.join(folder)))
        .map(|(system, folder)| (system.clone(), folder.clone()))
}

fn imported_title(id: i64, new_title: &NewTitle) -> Title {
    Title {
        id,
        name: new_title.name.clone(),
        filename: new_title.filename.clone(),
        path: new_title.path.clone(),
        size: new_title.size,
        extension: new_title.extension.clone(),
        system: new_title.system.clone(),
        date_added: new_title.date_added,
        last_played: None,
        play_count: 0,
        favorite: false,
        rating: 0,
        artwork: romdock_types::ArtworkRefs::default(),
        synced: false,
        last_synced: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use romdock_catalog::SqliteCatalog;
    use romdock_types::ArtworkSettings;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        catalog: SqliteCatalog,
        layout: DataLayout,
        profile: SyncProfile,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let device = temp.path().join("device");
        std::fs::create_dir_all(device.join("FC")).unwrap();
        std::fs::create_dir_all(device.join("GB")).unwrap();

        let layout = DataLayout::new(temp.path().join("data"));
        layout.ensure().unwrap();

        let mut system_mappings = BTreeMap::new();
        system_mappings.insert(
            "Nintendo Entertainment System".to_string(),
            "FC".to_string(),
        );
        system_mappings.insert("Game Boy".to_string(), "GB".to_string());
        system_mappings.insert("Nintendo 64".to_string(), "N64".to_string());

        Fixture {
            catalog: SqliteCatalog::open_in_memory().unwrap(),
            layout,
            profile: SyncProfile {
                id: "miyoo-mini".to_string(),
                name: "Miyoo Mini Plus".to_string(),
                firmware: None,
                enabled: true,
                base_path: device,
                system_mappings,
                artwork: ArtworkSettings::default(),
            },
            _temp: temp,
        }
    }

    #[tokio::test]
    async fn test_scan_finds_only_recognized_uncataloged_files() {
        let fixture = fixture();
        let device = &fixture.profile.base_path;
        std::fs::write(device.join("FC/Metroid.nes"), b"rom").unwrap();
        std::fs::write(device.join("FC/readme.txt"), b"not a rom").unwrap();
        std::fs::write(device.join("GB/Tetris.gb"), b"rom").unwrap();
        // The N64 folder does not exist on the device; it is skipped silently

        let scanner = DeviceScanner::new(&fixture.catalog, fixture.layout.clone());
        let mut found = scanner.scan_for_uncataloged(&fixture.profile).await.unwrap();
        found.sort_by(|a, b| a.filename.cmp(&b.filename));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].filename, "Metroid.nes");
        assert_eq!(found[0].system, "Nintendo Entertainment System");
        assert_eq!(found[1].filename, "Tetris.gb");
        assert_eq!(found[1].system, "Game Boy");
    }

    #[tokio::test]
    async fn test_scan_excludes_cataloged_paths() {
        let fixture = fixture();
        let device = &fixture.profile.base_path;
        let rom = device.join("FC/Metroid.nes");
        std::fs::write(&rom, b"rom").unwrap();
        fixture
            .catalog
            .add_title(&NewTitle {
                name: "Metroid".to_string(),
                filename: "Metroid.nes".to_string(),
                path: rom,
                size: 3,
                extension: ".nes".to_string(),
                system: "Nintendo Entertainment System".to_string(),
                date_added: chrono::Utc::now(),
            })
            .unwrap();

        let scanner = DeviceScanner::new(&fixture.catalog, fixture.layout.clone());
        let found = scanner.scan_for_uncataloged(&fixture.profile).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_import_creates_titles_and_pulls_saves() {
        let fixture = fixture();
        let device = &fixture.profile.base_path;
        std::fs::write(device.join("FC/Metroid.nes"), b"rom").unwrap();
        // A save sits next to the title on the device
        std::fs::write(device.join("FC/Metroid.sav"), b"sram").unwrap();

        let scanner = DeviceScanner::new(&fixture.catalog, fixture.layout.clone());
        let report = scanner
            .import_candidates(&fixture.profile, &[device.join("FC/Metroid.nes")])
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 0);
        assert!(report.errors.is_empty());
        assert_eq!(report.saves.copied, 1);

        let title = fixture
            .catalog
            .title_by_path(&device.join("FC/Metroid.nes"))
            .unwrap()
            .unwrap();
        assert_eq!(title.system, "Nintendo Entertainment System");
        assert_eq!(title.name, "Metroid");
        // The pulled save landed in the local store and the catalog
        assert!(fixture
            .layout
            .title_save_dir(title.id)
            .join("Metroid.sav")
            .exists());
        assert_eq!(fixture.catalog.saves_for(title.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_skips_duplicates_and_collects_errors() {
        let fixture = fixture();
        let device = &fixture.profile.base_path;
        std::fs::write(device.join("FC/Metroid.nes"), b"rom").unwrap();

        let scanner = DeviceScanner::new(&fixture.catalog, fixture.layout.clone());
        let paths = vec![
            device.join("FC/Metroid.nes"),
            device.join("FC/Missing.nes"),
            fixture._temp.path().join("outside/Stray.nes"),
        ];

        let first = scanner.import_candidates(&fixture.profile, &paths).await.unwrap();
        assert_eq!(first.imported, 1);
        assert_eq!(first.errors.len(), 2);

        // A second import of the same path is a duplicate-by-path skip
        let second = scanner
            .import_candidates(&fixture.profile, &[device.join("FC/Metroid.nes")])
            .await
            .unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.skipped, 1);
    }

    #[tokio::test]
    async fn test_scan_against_missing_root_fails() {
        let fixture = fixture();
        let mut profile = fixture.profile.clone();
        profile.base_path = fixture._temp.path().join("unplugged");

        let scanner = DeviceScanner::new(&fixture.catalog, fixture.layout.clone());
        let error = scanner.scan_for_uncataloged(&profile).await.unwrap_err();
        assert!(error.is_fatal());
    }
}
