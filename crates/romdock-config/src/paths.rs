//! Local data directory layout
//!
//! Everything romdock persists locally lives under one data root: the
//! settings file, the catalog database, the artwork cache, and the
//! per-title save directories. Device-side layout is owned by each sync
//! profile's mapping table, not by this module.

use crate::{ConfigError, ConfigResult};
use romdock_types::{ArtworkKind, BoxartStyle, TitleId};
use std::path::{Path, PathBuf};

/// Directory name of the artwork cache under the data root
const ARTWORK_DIR: &str = "artwork";

/// Directory name of the local save store under the data root
const SAVES_DIR: &str = "saves";

/// Resolved layout of the local data directory
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    /// Layout rooted at an explicit directory
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at the platform data directory
    pub fn discover() -> ConfigResult<Self> {
        let base = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(Self::new(base.join("romdock")))
    }

    /// The data root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.toml")
    }

    /// Path of the catalog database
    pub fn catalog_file(&self) -> PathBuf {
        self.root.join("romdock.db")
    }

    /// Root of the artwork cache
    pub fn artwork_dir(&self) -> PathBuf {
        self.root.join(ARTWORK_DIR)
    }

    /// Cached artwork file for a title and kind.
    ///
    /// The cache stores JPEG regardless of a profile's declared output
    /// format; profiles only rewrite the destination extension.
    pub fn artwork_path(&self, kind: ArtworkKind, title_id: TitleId) -> PathBuf {
        self.artwork_dir()
            .join(kind.folder())
            .join(format!("{title_id}.jpg"))
    }

    /// Cached boxart variant file for a title, style, and region
    pub fn boxart_variant_path(
        &self,
        title_id: TitleId,
        style: BoxartStyle,
        region: &str,
    ) -> PathBuf {
        self.artwork_dir()
            .join(ArtworkKind::Boxart.folder())
            .join(format!("{title_id}.{}.{region}.jpg", style.as_str()))
    }

    /// Root of the local save store
    pub fn saves_dir(&self) -> PathBuf {
        self.root.join(SAVES_DIR)
    }

    /// Local save directory for one title
    pub fn title_save_dir(&self, title_id: TitleId) -> PathBuf {
        self.saves_dir().join(title_id.to_string())
    }

    /// Create the data root and cache directories if absent
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.saves_dir())?;
        for kind in [
            ArtworkKind::Boxart,
            ArtworkKind::Screenshot,
            ArtworkKind::Banner,
            ArtworkKind::Fanart,
        ] {
            std::fs::create_dir_all(self.artwork_dir().join(kind.folder()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = DataLayout::new("/data/romdock");

        assert_eq!(
            layout.artwork_path(ArtworkKind::Boxart, 7),
            PathBuf::from("/data/romdock/artwork/boxart/7.jpg")
        );
        assert_eq!(
            layout.boxart_variant_path(7, BoxartStyle::ThreeD, "eu"),
            PathBuf::from("/data/romdock/artwork/boxart/7.3d.eu.jpg")
        );
        assert_eq!(
            layout.title_save_dir(42),
            PathBuf::from("/data/romdock/saves/42")
        );
    }

    #[test]
    fn test_ensure_creates_cache_dirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = DataLayout::new(temp.path().join("data"));

        layout.ensure().unwrap();

        assert!(layout.saves_dir().is_dir());
        assert!(layout.artwork_dir().join("boxart").is_dir());
        assert!(layout.artwork_dir().join("fanart").is_dir());
    }
}
