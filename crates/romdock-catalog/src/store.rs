//! Catalog store contract implementation

use crate::{db_err, SqliteCatalog};
use chrono::{DateTime, Utc};
use romdock_types::{
    ArtworkRefs, CatalogStore, Error, LibraryStatus, NewHistoryRecord, NewSave, NewTitle,
    OperationKind, Result, RunStatus, SaveId, SaveRecord, SaveUpdate, SyncDirection,
    SyncHistoryRecord, Title, TitleFilter, TitleId, TitleSort, TitleUpdate,
};
use rusqlite::{params, params_from_iter, Row, ToSql};
use std::path::{Path, PathBuf};
use tracing::trace;

const TITLE_COLUMNS: &str = "id, name, filename, path, size, extension, system, date_added, \
     last_played, play_count, favorite, rating, boxart, boxart_2d, boxart_3d, boxart_region, \
     screenshot, banner, fanart, synced, last_synced";

const SAVE_COLUMNS: &str = "id, title_id, save_type, filename, local_path, device_path, size, \
     last_modified, last_synced, sync_direction";

const HISTORY_COLUMNS: &str = "id, profile_id, profile_name, timestamp, operation, rom_count, \
     roms_synced, roms_skipped, roms_errored, saves_copied, saves_skipped, bytes_moved, \
     duration_ms, status, error_summary, details";

fn ts_to_sql(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn ts_from_sql(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_deref()
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn path_to_sql(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn opt_path(value: Option<String>) -> Option<PathBuf> {
    value.map(PathBuf::from)
}

fn row_to_title(row: &Row<'_>) -> rusqlite::Result<Title> {
    Ok(Title {
        id: row.get(0)?,
        name: row.get(1)?,
        filename: row.get(2)?,
        path: PathBuf::from(row.get::<_, String>(3)?),
        size: row.get::<_, i64>(4)?.max(0) as u64,
        extension: row.get(5)?,
        system: row.get(6)?,
        date_added: ts_from_sql(row.get(7)?).unwrap_or_default(),
        last_played: ts_from_sql(row.get(8)?),
        play_count: row.get::<_, i64>(9)?.max(0) as u32,
        favorite: row.get::<_, i64>(10)? != 0,
        rating: row.get::<_, i64>(11)?.clamp(0, 5) as u8,
        artwork: ArtworkRefs {
            boxart: opt_path(row.get(12)?),
            boxart_2d: opt_path(row.get(13)?),
            boxart_3d: opt_path(row.get(14)?),
            boxart_region: row.get(15)?,
            screenshot: opt_path(row.get(16)?),
            banner: opt_path(row.get(17)?),
            fanart: opt_path(row.get(18)?),
        },
        synced: row.get::<_, i64>(19)? != 0,
        last_synced: ts_from_sql(row.get(20)?),
    })
}

fn row_to_save(row: &Row<'_>) -> rusqlite::Result<SaveRecord> {
    Ok(SaveRecord {
        id: row.get(0)?,
        title_id: row.get(1)?,
        save_type: row.get(2)?,
        filename: row.get(3)?,
        local_path: opt_path(row.get(4)?),
        device_path: opt_path(row.get(5)?),
        size: row.get::<_, i64>(6)?.max(0) as u64,
        last_modified: ts_from_sql(row.get(7)?),
        last_synced: ts_from_sql(row.get(8)?),
        direction: row
            .get::<_, Option<String>>(9)?
            .as_deref()
            .and_then(SyncDirection::parse),
    })
}

fn row_to_history(row: &Row<'_>) -> rusqlite::Result<SyncHistoryRecord> {
    let details: Option<String> = row.get(15)?;
    Ok(SyncHistoryRecord {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        profile_name: row.get(2)?,
        timestamp: ts_from_sql(row.get(3)?).unwrap_or_default(),
        operation: OperationKind::parse(&row.get::<_, String>(4)?)
            .unwrap_or(OperationKind::SyncAll),
        rom_count: row.get::<_, i64>(5)?.max(0) as u32,
        roms_synced: row.get::<_, i64>(6)?.max(0) as u32,
        roms_skipped: row.get::<_, i64>(7)?.max(0) as u32,
        roms_errored: row.get::<_, i64>(8)?.max(0) as u32,
        saves_copied: row.get::<_, i64>(9)?.max(0) as u32,
        saves_skipped: row.get::<_, i64>(10)?.max(0) as u32,
        bytes_moved: row.get::<_, i64>(11)?.max(0) as u64,
        duration_ms: row.get::<_, i64>(12)?.max(0) as u64,
        status: RunStatus::parse(&row.get::<_, String>(13)?).unwrap_or(RunStatus::Partial),
        error_summary: row.get(14)?,
        details: details.and_then(|raw| serde_json::from_str(&raw).ok()),
    })
}

fn sort_column(sort: TitleSort) -> &'static str {
    match sort {
        TitleSort::Name => "name",
        TitleSort::DateAdded => "date_added",
        TitleSort::LastPlayed => "last_played",
        TitleSort::Size => "size",
        TitleSort::Rating => "rating",
    }
}

impl CatalogStore for SqliteCatalog {
    fn title(&self, id: TitleId) -> Result<Option<Title>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {TITLE_COLUMNS} FROM titles WHERE id = ?"))
            .map_err(db_err)?;
        let mut rows = stmt
            .query_map(params![id], row_to_title)
            .map_err(db_err)?;
        rows.next().transpose().map_err(db_err)
    }

    fn titles(&self, filter: &TitleFilter) -> Result<Vec<Title>> {
        let mut sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE 1=1");
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(system) = &filter.system {
            sql.push_str(" AND system = ?");
            args.push(Box::new(system.clone()));
        }
        if let Some(search) = &filter.search {
            sql.push_str(" AND name LIKE ?");
            args.push(Box::new(format!("%{search}%")));
        }
        if filter.favorites_only {
            sql.push_str(" AND favorite = 1");
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(sort_column(filter.sort));
        sql.push_str(if filter.descending { " DESC" } else { " ASC" });

        let mut stmt = self.conn().prepare(&sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params_from_iter(args), row_to_title)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    fn title_by_path(&self, path: &Path) -> Result<Option<Title>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {TITLE_COLUMNS} FROM titles WHERE path = ?"))
            .map_err(db_err)?;
        let mut rows = stmt
            .query_map(params![path_to_sql(path)], row_to_title)
            .map_err(db_err)?;
        rows.next().transpose().map_err(db_err)
    }

    fn add_title(&self, title: &NewTitle) -> Result<TitleId> {
        self.conn()
            .execute(
                "INSERT INTO titles (name, filename, path, size, extension, system, date_added)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    title.name,
                    title.filename,
                    path_to_sql(&title.path),
                    title.size as i64,
                    title.extension,
                    title.system,
                    ts_to_sql(title.date_added),
                ],
            )
            .map_err(db_err)?;
        Ok(self.conn().last_insert_rowid())
    }

    fn update_title(&self, id: TitleId, update: &TitleUpdate) -> Result<()> {
        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(synced) = update.synced {
            sets.push("synced = ?");
            args.push(Box::new(i64::from(synced)));
        }
        if let Some(last_synced) = update.last_synced {
            sets.push("last_synced = ?");
            args.push(Box::new(ts_to_sql(last_synced)));
        }
        if let Some(last_played) = update.last_played {
            sets.push("last_played = ?");
            args.push(Box::new(ts_to_sql(last_played)));
        }
        if let Some(play_count) = update.play_count {
            sets.push("play_count = ?");
            args.push(Box::new(i64::from(play_count)));
        }
        if let Some(favorite) = update.favorite {
            sets.push("favorite = ?");
            args.push(Box::new(i64::from(favorite)));
        }
        if let Some(rating) = update.rating {
            sets.push("rating = ?");
            args.push(Box::new(i64::from(rating)));
        }
        if let Some(boxart) = &update.boxart {
            sets.push("boxart = ?");
            args.push(Box::new(path_to_sql(boxart)));
        }
        if let Some(boxart_2d) = &update.boxart_2d {
            sets.push("boxart_2d = ?");
            args.push(Box::new(path_to_sql(boxart_2d)));
        }
        if let Some(boxart_3d) = &update.boxart_3d {
            sets.push("boxart_3d = ?");
            args.push(Box::new(path_to_sql(boxart_3d)));
        }
        if let Some(region) = &update.boxart_region {
            sets.push("boxart_region = ?");
            args.push(Box::new(region.clone()));
        }
        if let Some(screenshot) = &update.screenshot {
            sets.push("screenshot = ?");
            args.push(Box::new(path_to_sql(screenshot)));
        }
        if let Some(banner) = &update.banner {
            sets.push("banner = ?");
            args.push(Box::new(path_to_sql(banner)));
        }
        if let Some(fanart) = &update.fanart {
            sets.push("fanart = ?");
            args.push(Box::new(path_to_sql(fanart)));
        }

        if sets.is_empty() {
            return Ok(());
        }

        args.push(Box::new(id));
        let sql = format!("UPDATE titles SET {} WHERE id = ?", sets.join(", "));
        trace!("update_title({id}): {}", sets.join(", "));
        let changed = self
            .conn()
            .execute(&sql, params_from_iter(args))
            .map_err(db_err)?;
        if changed == 0 {
            return Err(Error::catalog(format!("no title with id {id}")));
        }
        Ok(())
    }

    fn saves_for(&self, title_id: TitleId) -> Result<Vec<SaveRecord>> {
        let mut stmt = self
            .conn()
            .prepare(&format!(
                "SELECT {SAVE_COLUMNS} FROM saves WHERE title_id = ? ORDER BY filename"
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![title_id], row_to_save)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    fn upsert_save(&self, save: &NewSave) -> Result<SaveId> {
        self.conn()
            .execute(
                "INSERT INTO saves (title_id, save_type, filename, local_path, device_path,
                                    size, last_modified, last_synced, sync_direction)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(title_id, filename) DO UPDATE SET
                     save_type = excluded.save_type,
                     local_path = COALESCE(excluded.local_path, saves.local_path),
                     device_path = COALESCE(excluded.device_path, saves.device_path),
                     size = excluded.size,
                     last_modified = COALESCE(excluded.last_modified, saves.last_modified),
                     last_synced = COALESCE(excluded.last_synced, saves.last_synced),
                     sync_direction = COALESCE(excluded.sync_direction, saves.sync_direction)",
                params![
                    save.title_id,
                    save.save_type,
                    save.filename,
                    save.local_path.as_deref().map(path_to_sql),
                    save.device_path.as_deref().map(path_to_sql),
                    save.size as i64,
                    save.last_modified.map(ts_to_sql),
                    save.last_synced.map(ts_to_sql),
                    save.direction.map(SyncDirection::as_str),
                ],
            )
            .map_err(db_err)?;

        self.conn()
            .query_row(
                "SELECT id FROM saves WHERE title_id = ? AND filename = ?",
                params![save.title_id, save.filename],
                |row| row.get(0),
            )
            .map_err(db_err)
    }

    fn update_save(&self, id: SaveId, update: &SaveUpdate) -> Result<()> {
        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(local_path) = &update.local_path {
            sets.push("local_path = ?");
            args.push(Box::new(path_to_sql(local_path)));
        }
        if let Some(device_path) = &update.device_path {
            sets.push("device_path = ?");
            args.push(Box::new(path_to_sql(device_path)));
        }
        if let Some(size) = update.size {
            sets.push("size = ?");
            args.push(Box::new(size as i64));
        }
        if let Some(last_modified) = update.last_modified {
            sets.push("last_modified = ?");
            args.push(Box::new(ts_to_sql(last_modified)));
        }
        if let Some(last_synced) = update.last_synced {
            sets.push("last_synced = ?");
            args.push(Box::new(ts_to_sql(last_synced)));
        }
        if let Some(direction) = update.direction {
            sets.push("sync_direction = ?");
            args.push(Box::new(direction.as_str()));
        }

        if sets.is_empty() {
            return Ok(());
        }

        args.push(Box::new(id));
        let sql = format!("UPDATE saves SET {} WHERE id = ?", sets.join(", "));
        let changed = self
            .conn()
            .execute(&sql, params_from_iter(args))
            .map_err(db_err)?;
        if changed == 0 {
            return Err(Error::catalog(format!("no save with id {id}")));
        }
        Ok(())
    }

    fn record_history(&self, record: &NewHistoryRecord) -> Result<i64> {
        let details = record
            .details
            .as_ref()
            .map(serde_json::Value::to_string);
        self.conn()
            .execute(
                "INSERT INTO sync_history (profile_id, profile_name, timestamp, operation,
                     rom_count, roms_synced, roms_skipped, roms_errored, saves_copied,
                     saves_skipped, bytes_moved, duration_ms, status, error_summary, details)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    record.profile_id,
                    record.profile_name,
                    ts_to_sql(record.timestamp),
                    record.operation.as_str(),
                    i64::from(record.rom_count),
                    i64::from(record.roms_synced),
                    i64::from(record.roms_skipped),
                    i64::from(record.roms_errored),
                    i64::from(record.saves_copied),
                    i64::from(record.saves_skipped),
                    record.bytes_moved as i64,
                    record.duration_ms as i64,
                    record.status.as_str(),
                    record.error_summary,
                    details,
                ],
            )
            .map_err(db_err)?;
        Ok(self.conn().last_insert_rowid())
    }

    fn history(&self, limit: Option<u32>, profile: Option<&str>) -> Result<Vec<SyncHistoryRecord>> {
        let mut sql = format!("SELECT {HISTORY_COLUMNS} FROM sync_history");
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(profile) = profile {
            sql.push_str(" WHERE profile_id = ?");
            args.push(Box::new(profile.to_string()));
        }
        sql.push_str(" ORDER BY id DESC");
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            args.push(Box::new(i64::from(limit)));
        }

        let mut stmt = self.conn().prepare(&sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params_from_iter(args), row_to_history)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    fn purge_history_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let removed = self
            .conn()
            .execute(
                "DELETE FROM sync_history WHERE timestamp < ?",
                params![ts_to_sql(cutoff)],
            )
            .map_err(db_err)?;
        Ok(removed as u64)
    }

    fn purge_history_all(&self) -> Result<u64> {
        let removed = self
            .conn()
            .execute("DELETE FROM sync_history", [])
            .map_err(db_err)?;
        Ok(removed as u64)
    }

    fn library_status(&self) -> Result<LibraryStatus> {
        self.conn()
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(synced), 0) FROM titles",
                [],
                |row| {
                    let total: i64 = row.get(0)?;
                    let synced: i64 = row.get(1)?;
                    Ok(LibraryStatus {
                        total: total.max(0) as u64,
                        synced: synced.max(0) as u64,
                        unsynced: (total - synced).max(0) as u64,
                    })
                },
            )
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use crate::SqliteCatalog;
    use chrono::{Duration, Utc};
    use romdock_types::{
        CatalogStore, NewHistoryRecord, NewSave, NewTitle, OperationKind, RunStatus,
        SyncDirection, TitleFilter, TitleSort, TitleUpdate,
    };
    use std::path::Path;

    fn new_title(name: &str, system: &str) -> NewTitle {
        NewTitle {
            name: name.to_string(),
            filename: format!("{name}.nes"),
            path: format!("/library/{name}.nes").into(),
            size: 1024,
            extension: ".nes".to_string(),
            system: system.to_string(),
            date_added: Utc::now(),
        }
    }

    fn history_record(profile: &str, status: RunStatus) -> NewHistoryRecord {
        NewHistoryRecord {
            profile_id: profile.to_string(),
            profile_name: profile.to_string(),
            timestamp: Utc::now(),
            operation: OperationKind::SyncAll,
            rom_count: 2,
            roms_synced: 1,
            roms_skipped: 1,
            roms_errored: 0,
            saves_copied: 0,
            saves_skipped: 0,
            bytes_moved: 1024,
            duration_ms: 17,
            status,
            error_summary: None,
            details: None,
        }
    }

    #[test]
    fn test_title_round_trip() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let id = catalog.add_title(&new_title("Metroid", "Nintendo Entertainment System")).unwrap();

        let title = catalog.title(id).unwrap().unwrap();
        assert_eq!(title.name, "Metroid");
        assert!(!title.synced);
        assert!(title.last_synced.is_none());

        let found = catalog
            .title_by_path(Path::new("/library/Metroid.nes"))
            .unwrap();
        assert_eq!(found.map(|t| t.id), Some(id));
    }

    #[test]
    fn test_canonical_path_is_unique() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        catalog.add_title(&new_title("Metroid", "Nintendo Entertainment System")).unwrap();
        let duplicate = catalog.add_title(&new_title("Metroid", "Nintendo Entertainment System"));
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_filtered_query() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        catalog.add_title(&new_title("Metroid", "Nintendo Entertainment System")).unwrap();
        catalog.add_title(&new_title("Zelda", "Nintendo Entertainment System")).unwrap();
        let snes = catalog.add_title(&new_title("Chrono", "Super Nintendo")).unwrap();
        catalog
            .update_title(
                snes,
                &TitleUpdate {
                    favorite: Some(true),
                    ..TitleUpdate::default()
                },
            )
            .unwrap();

        let nes = catalog
            .titles(&TitleFilter {
                system: Some("Nintendo Entertainment System".to_string()),
                ..TitleFilter::default()
            })
            .unwrap();
        assert_eq!(nes.len(), 2);
        // Default ordering is by name ascending
        assert_eq!(nes[0].name, "Metroid");

        let favorites = catalog
            .titles(&TitleFilter {
                favorites_only: true,
                ..TitleFilter::default()
            })
            .unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "Chrono");

        let searched = catalog
            .titles(&TitleFilter {
                search: Some("eld".to_string()),
                sort: TitleSort::DateAdded,
                descending: true,
                ..TitleFilter::default()
            })
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].name, "Zelda");
    }

    #[test]
    fn test_mark_synced() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let id = catalog.add_title(&new_title("Metroid", "Nintendo Entertainment System")).unwrap();

        let now = Utc::now();
        catalog.update_title(id, &TitleUpdate::synced_at(now)).unwrap();

        let title = catalog.title(id).unwrap().unwrap();
        assert!(title.synced);
        // synced=1 implies last_synced is set
        assert!(title.last_synced.is_some());

        let status = catalog.library_status().unwrap();
        assert_eq!(status.total, 1);
        assert_eq!(status.synced, 1);
        assert_eq!(status.unsynced, 0);
    }

    #[test]
    fn test_upsert_save_is_keyed_on_title_and_filename() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let id = catalog.add_title(&new_title("Metroid", "Nintendo Entertainment System")).unwrap();

        let first = catalog
            .upsert_save(&NewSave {
                title_id: id,
                save_type: "SRAM".to_string(),
                filename: "Metroid.srm".to_string(),
                local_path: Some("/saves/1/Metroid.srm".into()),
                device_path: None,
                size: 8192,
                last_modified: None,
                last_synced: None,
                direction: Some(SyncDirection::FromDevice),
            })
            .unwrap();

        // Second reconciliation of the same filename updates in place and
        // keeps the local path that the update did not carry
        let second = catalog
            .upsert_save(&NewSave {
                title_id: id,
                save_type: "SRAM".to_string(),
                filename: "Metroid.srm".to_string(),
                local_path: None,
                device_path: Some("/device/FC/Metroid.srm".into()),
                size: 8192,
                last_modified: None,
                last_synced: Some(Utc::now()),
                direction: Some(SyncDirection::ToDevice),
            })
            .unwrap();

        assert_eq!(first, second);
        let saves = catalog.saves_for(id).unwrap();
        assert_eq!(saves.len(), 1);
        assert!(saves[0].local_path.is_some());
        assert!(saves[0].device_path.is_some());
        assert_eq!(saves[0].direction, Some(SyncDirection::ToDevice));
    }

    #[test]
    fn test_update_save_fields() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let title_id = catalog.add_title(&new_title("Metroid", "Nintendo Entertainment System")).unwrap();
        let save_id = catalog
            .upsert_save(&NewSave {
                title_id,
                save_type: "SRAM".to_string(),
                filename: "Metroid.srm".to_string(),
                local_path: Some("/saves/1/Metroid.srm".into()),
                device_path: None,
                size: 8192,
                last_modified: None,
                last_synced: None,
                direction: None,
            })
            .unwrap();

        let now = Utc::now();
        catalog
            .update_save(
                save_id,
                &romdock_types::SaveUpdate {
                    device_path: Some("/device/FC/Metroid.srm".into()),
                    last_synced: Some(now),
                    direction: Some(SyncDirection::ToDevice),
                    ..romdock_types::SaveUpdate::default()
                },
            )
            .unwrap();

        let saves = catalog.saves_for(title_id).unwrap();
        assert_eq!(
            saves[0].device_path.as_deref(),
            Some(std::path::Path::new("/device/FC/Metroid.srm"))
        );
        assert_eq!(saves[0].direction, Some(SyncDirection::ToDevice));
        assert!(saves[0].last_synced.is_some());

        // Updating a vanished row is an error, not a silent no-op
        assert!(catalog
            .update_save(
                save_id + 999,
                &romdock_types::SaveUpdate {
                    size: Some(1),
                    ..romdock_types::SaveUpdate::default()
                }
            )
            .is_err());
    }

    #[test]
    fn test_history_is_append_only_and_purgeable() {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        catalog.record_history(&history_record("miyoo-mini", RunStatus::Success)).unwrap();
        catalog.record_history(&history_record("steam-deck", RunStatus::Partial)).unwrap();

        let all = catalog.history(None, None).unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].profile_id, "steam-deck");

        let filtered = catalog.history(Some(10), Some("miyoo-mini")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].status, RunStatus::Success);

        let removed = catalog
            .purge_history_before(Utc::now() - Duration::hours(1))
            .unwrap();
        assert_eq!(removed, 0);

        let removed = catalog.purge_history_all().unwrap();
        assert_eq!(removed, 2);
        assert!(catalog.history(None, None).unwrap().is_empty());
    }
}
