//! Artwork variant resolution and device artwork sync
//!
//! Boxart is cached locally in style and region variants. The resolver
//! picks the best cached file for a preference pair by probing style, then
//! region fallbacks; the sync step copies the winning file byte-verbatim
//! onto the device. No resizing or format conversion happens even when a
//! profile declares target dimensions; only the destination filename's
//! extension follows the profile's declared format.

use crate::resolver::PathResolver;
use romdock_config::{ArtworkPrefs, DataLayout};
use romdock_types::{
    ArtworkKind, ArtworkReport, BoxartStyle, CatalogStore, Error, Result, SyncProfile, Title,
    TitleError, TitleId,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Resolver over the locally cached artwork variants
#[derive(Debug, Clone)]
pub struct ArtworkResolver {
    layout: DataLayout,
}

impl ArtworkResolver {
    /// Create a resolver over the given data layout
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// The best cached boxart file for a style and region preference.
    ///
    /// Probes, in order: the preferred style in the preferred region, the
    /// preferred style across the fallback regions, then the opposite
    /// style in the same region order. The first cached file that exists
    /// wins.
    pub fn resolve_best_boxart(
        &self,
        title_id: TitleId,
        preferred_style: BoxartStyle,
        preferred_region: &str,
        fallback_regions: &[String],
    ) -> Option<PathBuf> {
        for style in [preferred_style, preferred_style.opposite()] {
            for region in std::iter::once(preferred_region)
                .chain(fallback_regions.iter().map(String::as_str))
            {
                let candidate = self.layout.boxart_variant_path(title_id, style, region);
                if candidate.is_file() {
                    debug!(
                        "Resolved boxart for title {title_id}: {} ({region}, {})",
                        candidate.display(),
                        style.as_str()
                    );
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// The cached file for a non-variant artwork kind, when present
    pub fn cached_path(&self, kind: ArtworkKind, title_id: TitleId) -> Option<PathBuf> {
        let path = self.layout.artwork_path(kind, title_id);
        path.is_file().then_some(path)
    }
}

/// Device artwork sync engine
#[derive(Debug)]
pub struct ArtworkSyncEngine<'a, C: CatalogStore> {
    catalog: &'a C,
    resolver: ArtworkResolver,
    prefs: ArtworkPrefs,
}

impl<'a, C: CatalogStore> ArtworkSyncEngine<'a, C> {
    /// Create an engine over the catalog, data layout, and global artwork
    /// preferences
    pub fn new(catalog: &'a C, layout: DataLayout, prefs: ArtworkPrefs) -> Self {
        Self {
            catalog,
            resolver: ArtworkResolver::new(layout),
            prefs,
        }
    }

    /// The resolver backing this engine
    pub fn resolver(&self) -> &ArtworkResolver {
        &self.resolver
    }

    /// Copy cached artwork for a batch of titles onto the profile's device.
    ///
    /// Titles on unmapped systems are skipped silently; titles with no
    /// cached artwork of a requested kind count as skips. The profile's
    /// own style and region preference overrides the global scraper
    /// preference; the global region fallback order applies either way.
    pub async fn sync_artwork(
        &self,
        profile: &SyncProfile,
        titles: &[Title],
        kinds: &[ArtworkKind],
    ) -> Result<ArtworkReport> {
        PathResolver::preflight(profile).await?;

        let mut report = ArtworkReport {
            total: titles.len() as u32,
            ..ArtworkReport::default()
        };

        info!(
            "Syncing {} artwork kind(s) for {} title(s) to '{}'",
            kinds.len(),
            titles.len(),
            profile.name
        );

        for title in titles {
            let Ok(folder) = PathResolver::resolve(profile, &title.system) else {
                continue;
            };
            let system_dir = profile.base_path.join(folder);

            for kind in kinds {
                let source = match kind {
                    ArtworkKind::Boxart => self.resolver.resolve_best_boxart(
                        title.id,
                        profile.artwork.preferred_style,
                        &profile.artwork.preferred_region,
                        &self.prefs.fallback_regions,
                    ),
                    other => self.resolver.cached_path(*other, title.id),
                };
                let Some(source) = source else {
                    report.skipped += 1;
                    continue;
                };

                match self.copy_artwork(profile, &system_dir, title, *kind, &source).await {
                    Ok(()) => {
                        report.copied += 1;
                        // Record the winning file as the title's primary
                        // boxart the first time one is resolved
                        if *kind == ArtworkKind::Boxart && title.artwork.boxart.is_none() {
                            let update = romdock_types::TitleUpdate {
                                boxart: Some(source.clone()),
                                ..romdock_types::TitleUpdate::default()
                            };
                            if self.catalog.update_title(title.id, &update).is_err() {
                                debug!("Could not record boxart path for '{}'", title.name);
                            }
                        }
                    }
                    Err(e) => report.errors.push(TitleError {
                        title: title.name.clone(),
                        error: e.to_string(),
                    }),
                }
            }
        }

        Ok(report)
    }

    /// Copy one artwork file into the device's artwork folder for a system.
    ///
    /// Boxart lands directly in the profile's artwork folder; other kinds
    /// get a subfolder per kind. The destination name is the title's base
    /// name with the profile's declared format extension.
    async fn copy_artwork(
        &self,
        profile: &SyncProfile,
        system_dir: &Path,
        title: &Title,
        kind: ArtworkKind,
        source: &Path,
    ) -> Result<()> {
        let mut target_dir = system_dir.join(&profile.artwork.folder);
        if kind != ArtworkKind::Boxart {
            target_dir = target_dir.join(kind.folder());
        }
        fs::create_dir_all(&target_dir).await?;

        let filename = format!(
            "{}.{}",
            title.base_name(),
            profile.artwork.format.extension()
        );
        let target = target_dir.join(filename);

        fs::copy(source, &target)
            .await
            .map_err(|e| Error::CopyFailed {
                source_path: source.to_path_buf(),
                destination: target.clone(),
                message: e.to_string(),
            })?;
        debug!("Copied {kind} for '{}' -> {}", title.name, target.display());
        Ok(())
    }
}
