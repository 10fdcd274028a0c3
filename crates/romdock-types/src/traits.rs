//! Store and collaborator contracts
//!
//! The synchronization engines consume the catalog and profile stores
//! through these narrow traits, and take them as explicit values rather
//! than module-level state. The artwork network client is an external
//! collaborator; only its contract lives here.

use crate::{
    LibraryStatus, NewHistoryRecord, NewSave, NewTitle, ProfileUpdate, ProgressEvent, Result,
    SaveId, SaveRecord, SaveUpdate, SyncHistoryRecord, SyncProfile, Title, TitleId, TitleUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

/// Filter and ordering for catalog title queries
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Restrict to one system tag
    pub system: Option<String>,
    /// Case-insensitive substring match on the display name
    pub search: Option<String>,
    /// Restrict to favorites
    pub favorites_only: bool,
    /// Sort column
    pub sort: TitleSort,
    /// Sort direction
    pub descending: bool,
}

/// Sort column for title queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleSort {
    /// By display name
    #[default]
    Name,
    /// By catalog insertion time
    DateAdded,
    /// By last-played time
    LastPlayed,
    /// By file size
    Size,
    /// By rating
    Rating,
}

/// Record CRUD plus filtered queries over the persistent catalog
pub trait CatalogStore {
    /// Point lookup of a title
    fn title(&self, id: TitleId) -> Result<Option<Title>>;

    /// Filtered, sorted title query
    fn titles(&self, filter: &TitleFilter) -> Result<Vec<Title>>;

    /// Lookup a title by its canonical source path
    fn title_by_path(&self, path: &Path) -> Result<Option<Title>>;

    /// Insert a title record, returning its identifier
    fn add_title(&self, title: &NewTitle) -> Result<TitleId>;

    /// Apply a field-level update to a title
    fn update_title(&self, id: TitleId, update: &TitleUpdate) -> Result<()>;

    /// Save records owned by a title
    fn saves_for(&self, title_id: TitleId) -> Result<Vec<SaveRecord>>;

    /// Insert or update a save record keyed on `(title_id, filename)`
    fn upsert_save(&self, save: &NewSave) -> Result<SaveId>;

    /// Apply a field-level update to a save record
    fn update_save(&self, id: SaveId, update: &SaveUpdate) -> Result<()>;

    /// Append one immutable audit row
    fn record_history(&self, record: &NewHistoryRecord) -> Result<i64>;

    /// Most recent audit rows, newest first
    fn history(&self, limit: Option<u32>, profile: Option<&str>) -> Result<Vec<SyncHistoryRecord>>;

    /// Delete audit rows older than the cutoff, returning the count removed
    fn purge_history_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// Delete every audit row, returning the count removed
    fn purge_history_all(&self) -> Result<u64>;

    /// Catalog-wide sync tally
    fn library_status(&self) -> Result<LibraryStatus>;
}

/// Read access and field-level updates over the configured sync profiles
pub trait ProfileStore {
    /// Every configured profile
    fn profiles(&self) -> Result<Vec<SyncProfile>>;

    /// Point lookup of a profile
    fn profile(&self, id: &str) -> Result<Option<SyncProfile>>;

    /// Apply a field-level update, returning the updated profile
    fn update_profile(&mut self, id: &str, update: &ProfileUpdate) -> Result<SyncProfile>;
}

/// Artwork kinds a title can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArtworkKind {
    /// Box art
    Boxart,
    /// In-game screenshot
    Screenshot,
    /// Banner
    Banner,
    /// Fan art
    Fanart,
}

impl ArtworkKind {
    /// Cache folder name for this kind
    pub fn folder(self) -> &'static str {
        match self {
            Self::Boxart => "boxart",
            Self::Screenshot => "screenshots",
            Self::Banner => "banners",
            Self::Fanart => "fanart",
        }
    }

    /// Parse a user-supplied kind name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "boxart" => Some(Self::Boxart),
            "screenshot" => Some(Self::Screenshot),
            "banner" => Some(Self::Banner),
            "fanart" => Some(Self::Fanart),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArtworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Boxart => "boxart",
            Self::Screenshot => "screenshot",
            Self::Banner => "banner",
            Self::Fanart => "fanart",
        };
        f.write_str(name)
    }
}

/// Remote artwork URLs keyed by region, as returned by a fetcher
#[derive(Debug, Clone, Default)]
pub struct MediaUrls {
    /// 2D boxart URLs by region code
    pub boxart_2d: BTreeMap<String, String>,
    /// 3D boxart URLs by region code
    pub boxart_3d: BTreeMap<String, String>,
    /// Screenshot URL
    pub screenshot: Option<String>,
    /// Banner URL
    pub banner: Option<String>,
    /// Fan-art URL
    pub fanart: Option<String>,
}

/// Contract of the artwork-fetching network client.
///
/// The client is an external collaborator that handles its own rate
/// limiting; no implementation ships in this repository.
#[async_trait]
pub trait ArtworkFetcher {
    /// Fetch remote artwork URLs for a title
    async fn fetch_artwork(&self, title: &Title, kinds: &[ArtworkKind]) -> Result<MediaUrls>;
}

/// Receiver for per-title progress events
pub trait ProgressSink {
    /// Called after each title, whether copied, skipped, or errored
    fn report(&self, event: &ProgressEvent);
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent),
{
    fn report(&self, event: &ProgressEvent) {
        self(event)
    }
}
