//! Catalog and profile record types
//!
//! Plain data carried between the catalog store, the profile store, and the
//! synchronization engines. Timestamps are UTC and persist as RFC 3339
//! strings; catalog rows are keyed by auto-incrementing identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Identifier of a cataloged title
pub type TitleId = i64;

/// Identifier of a save record
pub type SaveId = i64;

/// A cataloged game image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    /// Catalog identifier
    pub id: TitleId,
    /// Display name
    pub name: String,
    /// Original filename, including extension
    pub filename: String,
    /// Canonical source path, unique across the catalog
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercase file extension, with leading dot
    pub extension: String,
    /// System tag naming the platform
    pub system: String,
    /// When the title entered the catalog
    pub date_added: DateTime<Utc>,
    /// When the title was last launched
    pub last_played: Option<DateTime<Utc>>,
    /// Number of launches
    pub play_count: u32,
    /// Favorite flag
    pub favorite: bool,
    /// User rating, 0-5
    pub rating: u8,
    /// Cached artwork references
    pub artwork: ArtworkRefs,
    /// Whether the title has been copied to a device
    pub synced: bool,
    /// When the title was last copied to a device
    pub last_synced: Option<DateTime<Utc>>,
}

impl Title {
    /// Filename with the extension stripped, used to derive save and
    /// artwork filenames on the device.
    pub fn base_name(&self) -> &str {
        self.filename
            .strip_suffix(self.extension.as_str())
            .unwrap_or(&self.filename)
    }
}

/// Locally cached artwork references for a title
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtworkRefs {
    /// Primary boxart path
    pub boxart: Option<PathBuf>,
    /// 2D boxart variant path
    pub boxart_2d: Option<PathBuf>,
    /// 3D boxart variant path
    pub boxart_3d: Option<PathBuf>,
    /// Region the primary boxart came from
    pub boxart_region: Option<String>,
    /// Screenshot path
    pub screenshot: Option<PathBuf>,
    /// Banner path
    pub banner: Option<PathBuf>,
    /// Fan-art path
    pub fanart: Option<PathBuf>,
}

/// A title record about to enter the catalog
#[derive(Debug, Clone)]
pub struct NewTitle {
    /// Display name
    pub name: String,
    /// Original filename, including extension
    pub filename: String,
    /// Canonical source path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercase file extension, with leading dot
    pub extension: String,
    /// System tag naming the platform
    pub system: String,
    /// When the title entered the catalog
    pub date_added: DateTime<Utc>,
}

/// Field-level update for a title record.
///
/// `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default)]
pub struct TitleUpdate {
    /// Set the synced flag
    pub synced: Option<bool>,
    /// Set the last-synced timestamp
    pub last_synced: Option<DateTime<Utc>>,
    /// Set the last-played timestamp
    pub last_played: Option<DateTime<Utc>>,
    /// Set the play count
    pub play_count: Option<u32>,
    /// Set the favorite flag
    pub favorite: Option<bool>,
    /// Set the rating
    pub rating: Option<u8>,
    /// Set the primary boxart path
    pub boxart: Option<PathBuf>,
    /// Set the 2D boxart variant path
    pub boxart_2d: Option<PathBuf>,
    /// Set the 3D boxart variant path
    pub boxart_3d: Option<PathBuf>,
    /// Set the boxart source region
    pub boxart_region: Option<String>,
    /// Set the screenshot path
    pub screenshot: Option<PathBuf>,
    /// Set the banner path
    pub banner: Option<PathBuf>,
    /// Set the fan-art path
    pub fanart: Option<PathBuf>,
}

impl TitleUpdate {
    /// Update marking a title as synced at the given instant
    pub fn synced_at(when: DateTime<Utc>) -> Self {
        Self {
            synced: Some(true),
            last_synced: Some(when),
            ..Self::default()
        }
    }
}

/// Direction of the most recent save copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncDirection {
    /// Local save copied onto the device
    #[serde(rename = "to-device")]
    ToDevice,
    /// Device save copied into local storage
    #[serde(rename = "from-device")]
    FromDevice,
}

impl SyncDirection {
    /// Stable string form stored in the catalog
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDevice => "to-device",
            Self::FromDevice => "from-device",
        }
    }

    /// Parse the stored string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "to-device" => Some(Self::ToDevice),
            "from-device" => Some(Self::FromDevice),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One save-type file associated with a title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Catalog identifier
    pub id: SaveId,
    /// Owning title identifier
    pub title_id: TitleId,
    /// Save type label, e.g. "SRAM" or "Save State 3"
    pub save_type: String,
    /// Save filename, shared between both sides
    pub filename: String,
    /// Path of the local copy, if one exists
    pub local_path: Option<PathBuf>,
    /// Path of the device copy, if one exists
    pub device_path: Option<PathBuf>,
    /// File size in bytes
    pub size: u64,
    /// Modification time of the file the record was built from
    pub last_modified: Option<DateTime<Utc>>,
    /// When the save was last reconciled
    pub last_synced: Option<DateTime<Utc>>,
    /// Direction of the last copy
    pub direction: Option<SyncDirection>,
}

/// A save record about to enter the catalog
#[derive(Debug, Clone)]
pub struct NewSave {
    /// Owning title identifier
    pub title_id: TitleId,
    /// Save type label
    pub save_type: String,
    /// Save filename
    pub filename: String,
    /// Path of the local copy
    pub local_path: Option<PathBuf>,
    /// Path of the device copy
    pub device_path: Option<PathBuf>,
    /// File size in bytes
    pub size: u64,
    /// Modification time of the source file
    pub last_modified: Option<DateTime<Utc>>,
    /// When the save was reconciled
    pub last_synced: Option<DateTime<Utc>>,
    /// Direction of the copy that produced this record
    pub direction: Option<SyncDirection>,
}

/// Field-level update for a save record
#[derive(Debug, Clone, Default)]
pub struct SaveUpdate {
    /// Set the local path
    pub local_path: Option<PathBuf>,
    /// Set the device path
    pub device_path: Option<PathBuf>,
    /// Set the file size
    pub size: Option<u64>,
    /// Set the modification time
    pub last_modified: Option<DateTime<Utc>>,
    /// Set the last-synced timestamp
    pub last_synced: Option<DateTime<Utc>>,
    /// Set the last copy direction
    pub direction: Option<SyncDirection>,
}

/// Preferred boxart rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxartStyle {
    /// Flat 2D box scan
    #[serde(rename = "2d")]
    TwoD,
    /// Rendered 3D box
    #[serde(rename = "3d")]
    ThreeD,
}

impl BoxartStyle {
    /// The other style, used as the fallback tier
    pub fn opposite(self) -> Self {
        match self {
            Self::TwoD => Self::ThreeD,
            Self::ThreeD => Self::TwoD,
        }
    }

    /// Stable string form used in cache filenames
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoD => "2d",
            Self::ThreeD => "3d",
        }
    }
}

/// Output image format declared by a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG
    Jpeg,
    /// PNG
    Png,
}

impl ImageFormat {
    /// Destination filename extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Per-profile artwork settings.
///
/// Target dimensions are advisory only: artwork is copied byte-verbatim and
/// never resized or transcoded; only the destination filename's extension
/// follows `format`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkSettings {
    /// Folder name for artwork under each mapped system folder
    pub folder: String,
    /// Advisory target width in pixels
    pub width: u32,
    /// Advisory target height in pixels
    pub height: u32,
    /// Declared output format
    pub format: ImageFormat,
    /// Preferred boxart style
    pub preferred_style: BoxartStyle,
    /// Preferred boxart region
    pub preferred_region: String,
}

impl Default for ArtworkSettings {
    fn default() -> Self {
        Self {
            folder: "Imgs".to_string(),
            width: 250,
            height: 360,
            format: ImageFormat::Jpeg,
            preferred_style: BoxartStyle::TwoD,
            preferred_region: "wor".to_string(),
        }
    }
}

/// A named device target with its own folder mapping and artwork preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncProfile {
    /// Stable profile identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Firmware label, e.g. "OnionOS"
    #[serde(default)]
    pub firmware: Option<String>,
    /// Whether the profile may be synced to
    pub enabled: bool,
    /// Device root path; empty when not yet configured
    pub base_path: PathBuf,
    /// System tag to device-relative folder mapping
    pub system_mappings: BTreeMap<String, String>,
    /// Artwork preferences for this device
    #[serde(default)]
    pub artwork: ArtworkSettings,
}

impl SyncProfile {
    /// Whether the profile has a device root configured
    pub fn has_base_path(&self) -> bool {
        !self.base_path.as_os_str().is_empty()
    }
}

/// Field-level update for a sync profile
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Set the display name
    pub name: Option<String>,
    /// Set the firmware label
    pub firmware: Option<String>,
    /// Set the enabled flag
    pub enabled: Option<bool>,
    /// Set the device root path
    pub base_path: Option<PathBuf>,
    /// Replace the system mapping table
    pub system_mappings: Option<BTreeMap<String, String>>,
    /// Replace the artwork settings
    pub artwork: Option<ArtworkSettings>,
}

/// Operation kind recorded in the sync history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Whole-catalog sync
    SyncAll,
    /// Sync of a caller-selected subset
    SyncSelected,
}

impl OperationKind {
    /// Stable string form stored in the catalog
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SyncAll => "sync_all",
            Self::SyncSelected => "sync_selected",
        }
    }

    /// Parse the stored string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sync_all" => Some(Self::SyncAll),
            "sync_selected" => Some(Self::SyncSelected),
            _ => None,
        }
    }
}

/// Outcome status of an engine invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every title processed without error
    Success,
    /// At least one per-item error was recorded
    Partial,
}

impl RunStatus {
    /// Stable string form stored in the catalog
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
        }
    }

    /// Parse the stored string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Success),
            "partial" => Some(Self::Partial),
            _ => None,
        }
    }
}

/// Immutable audit row describing one engine invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncHistoryRecord {
    /// Catalog identifier
    pub id: i64,
    /// Profile the run targeted
    pub profile_id: String,
    /// Profile display name at the time of the run
    pub profile_name: String,
    /// When the run completed
    pub timestamp: DateTime<Utc>,
    /// Operation kind
    pub operation: OperationKind,
    /// Number of titles considered
    pub rom_count: u32,
    /// Number of titles copied
    pub roms_synced: u32,
    /// Number of titles skipped
    pub roms_skipped: u32,
    /// Number of titles that failed to copy
    pub roms_errored: u32,
    /// Number of save files copied (both directions)
    pub saves_copied: u32,
    /// Number of save files skipped (both directions)
    pub saves_skipped: u32,
    /// Total bytes moved
    pub bytes_moved: u64,
    /// Run duration in milliseconds
    pub duration_ms: u64,
    /// Outcome status
    pub status: RunStatus,
    /// Short error summary, when any error occurred
    pub error_summary: Option<String>,
    /// Details blob, capped to the first ten individual errors
    pub details: Option<serde_json::Value>,
}

/// A history row about to be recorded
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    /// Profile the run targeted
    pub profile_id: String,
    /// Profile display name at the time of the run
    pub profile_name: String,
    /// When the run completed
    pub timestamp: DateTime<Utc>,
    /// Operation kind
    pub operation: OperationKind,
    /// Number of titles considered
    pub rom_count: u32,
    /// Number of titles copied
    pub roms_synced: u32,
    /// Number of titles skipped
    pub roms_skipped: u32,
    /// Number of titles that failed to copy
    pub roms_errored: u32,
    /// Number of save files copied
    pub saves_copied: u32,
    /// Number of save files skipped
    pub saves_skipped: u32,
    /// Total bytes moved
    pub bytes_moved: u64,
    /// Run duration in milliseconds
    pub duration_ms: u64,
    /// Outcome status
    pub status: RunStatus,
    /// Short error summary
    pub error_summary: Option<String>,
    /// Details blob, capped to the first ten individual errors
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn title_with(filename: &str, extension: &str) -> Title {
        Title {
            id: 1,
            name: "Example".to_string(),
            filename: filename.to_string(),
            path: PathBuf::from("/library").join(filename),
            size: 4096,
            extension: extension.to_string(),
            system: "Nintendo Entertainment System".to_string(),
            date_added: Utc::now(),
            last_played: None,
            play_count: 0,
            favorite: false,
            rating: 0,
            artwork: ArtworkRefs::default(),
            synced: false,
            last_synced: None,
        }
    }

    #[rstest]
    #[case("Super Game.nes", ".nes", "Super Game")]
    #[case("archive.tar.zip", ".zip", "archive.tar")]
    #[case("noext", ".bin", "noext")]
    fn test_base_name(#[case] filename: &str, #[case] ext: &str, #[case] expected: &str) {
        let title = title_with(filename, ext);
        assert_eq!(title.base_name(), expected);
    }

    #[test]
    fn test_sync_direction_round_trip() {
        for direction in [SyncDirection::ToDevice, SyncDirection::FromDevice] {
            assert_eq!(SyncDirection::parse(direction.as_str()), Some(direction));
        }
        assert_eq!(SyncDirection::parse("sideways"), None);
    }

    #[test]
    fn test_boxart_style_opposite() {
        assert_eq!(BoxartStyle::TwoD.opposite(), BoxartStyle::ThreeD);
        assert_eq!(BoxartStyle::ThreeD.opposite(), BoxartStyle::TwoD);
    }

    #[test]
    fn test_profile_base_path() {
        let mut profile = SyncProfile {
            id: "custom".to_string(),
            name: "Custom Profile".to_string(),
            firmware: None,
            enabled: false,
            base_path: PathBuf::new(),
            system_mappings: BTreeMap::new(),
            artwork: ArtworkSettings::default(),
        };
        assert!(!profile.has_base_path());

        profile.base_path = PathBuf::from("/media/device");
        assert!(profile.has_base_path());
    }

    #[test]
    fn test_operation_kind_round_trip() {
        for kind in [OperationKind::SyncAll, OperationKind::SyncSelected] {
            assert_eq!(OperationKind::parse(kind.as_str()), Some(kind));
        }
    }
}
