//! Integration test suite for romdock
//!
//! This crate holds cross-crate scenario tests plus the shared fixtures
//! they run on: a temporary library directory, a temporary device root,
//! an in-memory catalog, and a mapped sync profile.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Shared fixtures for integration tests
pub mod fixtures {
    use romdock_catalog::SqliteCatalog;
    use romdock_config::DataLayout;
    use romdock_types::{ArtworkSettings, CatalogStore, NewTitle, SyncProfile, Title};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// A complete sync environment on temporary storage
    pub struct SyncFixture {
        /// Keeps the temporary tree alive for the test's lifetime
        pub temp: TempDir,
        /// In-memory catalog
        pub catalog: SqliteCatalog,
        /// Local data layout under the temporary tree
        pub layout: DataLayout,
        /// Source library directory
        pub library: PathBuf,
        /// Device root directory
        pub device: PathBuf,
        /// Enabled profile mapped for NES and Game Boy
        pub profile: SyncProfile,
    }

    impl SyncFixture {
        /// Build a fixture with an existing, empty device root
        pub fn new() -> Self {
            let temp = TempDir::new().expect("temp dir");
            let library = temp.path().join("library");
            let device = temp.path().join("device");
            std::fs::create_dir_all(&library).expect("library dir");
            std::fs::create_dir_all(&device).expect("device dir");

            let layout = DataLayout::new(temp.path().join("data"));
            layout.ensure().expect("data layout");

            let mut system_mappings = BTreeMap::new();
            system_mappings.insert(
                "Nintendo Entertainment System".to_string(),
                "FC".to_string(),
            );
            system_mappings.insert("Game Boy".to_string(), "GB".to_string());

            let profile = SyncProfile {
                id: "miyoo-mini".to_string(),
                name: "Miyoo Mini Plus".to_string(),
                firmware: Some("OnionOS".to_string()),
                enabled: true,
                base_path: device.clone(),
                system_mappings,
                artwork: ArtworkSettings::default(),
            };

            Self {
                catalog: SqliteCatalog::open_in_memory().expect("catalog"),
                layout,
                library,
                device,
                profile,
                temp,
            }
        }

        /// Write a library file and catalog it, returning the full record
        pub fn add_title(&self, name: &str, system: &str, content: &[u8]) -> Title {
            let filename = format!("{name}.nes");
            let path = self.library.join(&filename);
            std::fs::write(&path, content).expect("library file");

            let id = self
                .catalog
                .add_title(&NewTitle {
                    name: name.to_string(),
                    filename,
                    path,
                    size: content.len() as u64,
                    extension: ".nes".to_string(),
                    system: system.to_string(),
                    date_added: chrono::Utc::now(),
                })
                .expect("catalog insert");
            self.catalog.title(id).expect("lookup").expect("title")
        }

        /// Write a local save file for a title
        pub fn add_local_save(&self, title: &Title, filename: &str, content: &[u8]) -> PathBuf {
            let dir = self.layout.title_save_dir(title.id);
            std::fs::create_dir_all(&dir).expect("save dir");
            let path = dir.join(filename);
            std::fs::write(&path, content).expect("save file");
            path
        }

        /// Snapshot of every file path currently under a directory
        pub fn file_inventory(root: &std::path::Path) -> Vec<PathBuf> {
            let mut files = Vec::new();
            let mut stack = vec![root.to_path_buf()];
            while let Some(dir) = stack.pop() {
                let Ok(entries) = std::fs::read_dir(&dir) else {
                    continue;
                };
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_dir() {
                        stack.push(path);
                    } else {
                        files.push(path);
                    }
                }
            }
            files.sort();
            files
        }
    }

    impl Default for SyncFixture {
        fn default() -> Self {
            Self::new()
        }
    }
}
