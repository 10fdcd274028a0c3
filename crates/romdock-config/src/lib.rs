//! Settings and sync-profile management for romdock
//!
//! This crate owns the on-disk settings document: global artwork
//! preferences and the sync profile table. Settings load from a single
//! TOML file with per-section defaults, so a partial or missing file
//! always yields a complete configuration. The loaded manager implements
//! the [`ProfileStore`] contract consumed by the synchronization engines.
//!
//! # Examples
//!
//! ```rust,no_run
//! use romdock_config::SettingsManager;
//! use romdock_types::ProfileStore;
//!
//! let manager = SettingsManager::load_default().expect("settings");
//! for profile in manager.profiles().expect("profiles") {
//!     println!("{} -> {}", profile.name, profile.base_path.display());
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use romdock_types::{BoxartStyle, ProfileUpdate, Result, SyncProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod error;
pub mod paths;
pub mod profiles;

pub use error::{ConfigError, ConfigResult};
pub use paths::DataLayout;
pub use profiles::default_profiles;

/// Global artwork preferences used by the scraping pipeline.
///
/// A profile's own artwork settings override these when syncing to that
/// specific device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkPrefs {
    /// Preferred boxart style
    pub preferred_style: BoxartStyle,
    /// Preferred boxart region
    pub preferred_region: String,
    /// Region fallback order when the preferred region has no artwork
    pub fallback_regions: Vec<String>,
}

impl Default for ArtworkPrefs {
    fn default() -> Self {
        Self {
            preferred_style: BoxartStyle::TwoD,
            preferred_region: "wor".to_string(),
            fallback_regions: vec![
                "wor".to_string(),
                "us".to_string(),
                "eu".to_string(),
                "jp".to_string(),
            ],
        }
    }
}

/// The on-disk settings document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Data root override; the platform data directory when unset
    pub data_dir: Option<PathBuf>,
    /// Global artwork preferences
    pub artwork: ArtworkPrefs,
    /// Configured sync profiles
    pub profiles: Vec<SyncProfile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            artwork: ArtworkPrefs::default(),
            profiles: default_profiles(),
        }
    }
}

impl Settings {
    /// Resolve the data layout this settings document points at
    pub fn layout(&self) -> ConfigResult<DataLayout> {
        match &self.data_dir {
            Some(dir) => Ok(DataLayout::new(dir.clone())),
            None => DataLayout::discover(),
        }
    }
}

/// Loaded settings bound to their file, with save-on-update semantics
#[derive(Debug)]
pub struct SettingsManager {
    path: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from the platform-default location, creating the file
    /// with defaults when absent
    pub fn load_default() -> ConfigResult<Self> {
        let layout = DataLayout::discover()?;
        Self::load(layout.settings_file())
    }

    /// Load settings from an explicit file, creating it with defaults when
    /// absent
    pub fn load<P: Into<PathBuf>>(path: P) -> ConfigResult<Self> {
        let path = path.into();

        if !path.exists() {
            info!("No settings file at {}, creating defaults", path.display());
            let manager = Self {
                path,
                settings: Settings::default(),
            };
            manager.save()?;
            return Ok(manager);
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let settings: Settings = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(
            "Loaded {} profile(s) from {}",
            settings.profiles.len(),
            path.display()
        );

        Ok(Self { path, settings })
    }

    /// The loaded settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the current settings to the backing file
    pub fn save(&self) -> ConfigResult<()> {
        let content = toml::to_string_pretty(&self.settings)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Add or replace one system-to-folder mapping on a profile
    pub fn add_system_mapping(
        &mut self,
        profile_id: &str,
        system: &str,
        folder: &str,
    ) -> ConfigResult<()> {
        let profile = self
            .settings
            .profiles
            .iter_mut()
            .find(|p| p.id == profile_id)
            .ok_or_else(|| ConfigError::UnknownProfile {
                id: profile_id.to_string(),
            })?;
        profile
            .system_mappings
            .insert(system.to_string(), folder.to_string());
        self.save()
    }
}

impl romdock_types::ProfileStore for SettingsManager {
    fn profiles(&self) -> Result<Vec<SyncProfile>> {
        Ok(self.settings.profiles.clone())
    }

    fn profile(&self, id: &str) -> Result<Option<SyncProfile>> {
        Ok(self.settings.profiles.iter().find(|p| p.id == id).cloned())
    }

    fn update_profile(&mut self, id: &str, update: &ProfileUpdate) -> Result<SyncProfile> {
        let profile = self
            .settings
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| romdock_types::Error::ProfileNotFound { id: id.to_string() })?;

        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(firmware) = &update.firmware {
            profile.firmware = Some(firmware.clone());
        }
        if let Some(enabled) = update.enabled {
            profile.enabled = enabled;
        }
        if let Some(base_path) = &update.base_path {
            profile.base_path = base_path.clone();
        }
        if let Some(mappings) = &update.system_mappings {
            profile.system_mappings = mappings.clone();
        }
        if let Some(artwork) = &update.artwork {
            profile.artwork = artwork.clone();
        }

        let updated = profile.clone();
        self.save().map_err(romdock_types::Error::from)?;
        Ok(updated)
    }
}
