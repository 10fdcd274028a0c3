//! Device path resolution
//!
//! Maps a title's system tag to a device-relative folder through a
//! profile's mapping table, and checks that a profile's device root is
//! reachable. Resolution is a pure query; the reachability probe is the
//! only filesystem touch and runs before any batch operation mutates
//! state.

use romdock_types::{Error, ProfileCheck, Result, SyncProfile};
use tokio::fs;
use tracing::debug;

/// Pure resolver over a profile's mapping table and device root
#[derive(Debug, Clone, Copy)]
pub struct PathResolver;

impl PathResolver {
    /// The device-relative folder a system tag maps to.
    ///
    /// An unmapped system tag is a per-title, non-fatal condition: the
    /// title is unsynchronizable under this profile until a mapping is
    /// added.
    pub fn resolve<'p>(profile: &'p SyncProfile, system: &str) -> Result<&'p str> {
        profile
            .system_mappings
            .get(system)
            .map(String::as_str)
            .ok_or_else(|| Error::NoFolderMapping {
                system: system.to_string(),
            })
    }

    /// Confirm the profile's device root exists.
    ///
    /// An unreachable root aborts any batch operation before any file is
    /// touched, to avoid partial fan-out writes against a disconnected
    /// device.
    pub async fn verify_root(profile: &SyncProfile) -> Result<()> {
        match fs::metadata(&profile.base_path).await {
            Ok(metadata) if metadata.is_dir() => {
                debug!("Device root reachable: {}", profile.base_path.display());
                Ok(())
            }
            _ => Err(Error::ProfileUnreachable {
                path: profile.base_path.clone(),
            }),
        }
    }

    /// Pre-flight gate for sync operations: the profile must be enabled,
    /// have a device root configured, and the root must be reachable.
    pub async fn preflight(profile: &SyncProfile) -> Result<()> {
        if !profile.enabled || !profile.has_base_path() {
            return Err(Error::ProfileDisabled {
                id: profile.id.clone(),
            });
        }
        Self::verify_root(profile).await
    }

    /// Caller-facing reachability check, reported as a value rather than
    /// an error.
    pub async fn check(profile: &SyncProfile) -> ProfileCheck {
        if !profile.has_base_path() {
            return ProfileCheck {
                valid: false,
                message: Some("No device root configured".to_string()),
            };
        }
        match Self::verify_root(profile).await {
            Ok(()) => ProfileCheck {
                valid: true,
                message: None,
            },
            Err(_) => ProfileCheck {
                valid: false,
                message: Some("Device root does not exist or is not accessible".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use romdock_types::{ArtworkSettings, ErrorKind};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn profile(base_path: PathBuf) -> SyncProfile {
        let mut system_mappings = BTreeMap::new();
        system_mappings.insert(
            "Nintendo Entertainment System".to_string(),
            "FC".to_string(),
        );
        SyncProfile {
            id: "miyoo-mini".to_string(),
            name: "Miyoo Mini Plus".to_string(),
            firmware: Some("OnionOS".to_string()),
            enabled: true,
            base_path,
            system_mappings,
            artwork: ArtworkSettings::default(),
        }
    }

    #[test]
    fn test_resolve_mapped_system() {
        let profile = profile(PathBuf::from("/media/device"));
        assert_eq!(
            PathResolver::resolve(&profile, "Nintendo Entertainment System").unwrap(),
            "FC"
        );
    }

    #[test]
    fn test_resolve_unmapped_system() {
        let profile = profile(PathBuf::from("/media/device"));
        let error = PathResolver::resolve(&profile, "Vectrex").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Mapping);
        assert!(!error.is_fatal());
    }

    #[tokio::test]
    async fn test_verify_missing_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let profile = profile(temp.path().join("not-mounted"));

        let error = PathResolver::verify_root(&profile).await.unwrap_err();
        assert!(error.is_fatal());

        let check = PathResolver::check(&profile).await;
        assert!(!check.valid);
        assert!(check.message.is_some());
    }

    #[tokio::test]
    async fn test_preflight_disabled_profile() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut profile = profile(temp.path().to_path_buf());
        profile.enabled = false;

        let error = PathResolver::preflight(&profile).await.unwrap_err();
        assert!(matches!(error, Error::ProfileDisabled { .. }));
    }

    #[tokio::test]
    async fn test_preflight_reachable_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let profile = profile(temp.path().to_path_buf());
        assert!(PathResolver::preflight(&profile).await.is_ok());
    }
}
