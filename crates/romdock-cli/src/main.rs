//! romdock - personal media library manager for cartridge and disc images
//!
//! Synchronizes cataloged titles, their save files, and cached artwork to
//! handheld devices mounted as plain directories.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use romdock_catalog::SqliteCatalog;
use romdock_config::{DataLayout, SettingsManager};
use romdock_sync::{ArtworkSyncEngine, DeviceScanner, PathResolver, TransferEngine, TransferOptions};
use romdock_types::{
    ArtworkKind, CatalogStore, OperationKind, ProfileStore, SyncProfile, Title, TitleFilter,
    TitleId,
};
use std::path::PathBuf;
use tracing::info;

mod display;
mod json_output;
mod progress;

use progress::SyncProgressBar;

/// romdock - sync a retro game library to handheld devices
#[derive(Parser)]
#[command(
    name = "romdock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Personal media library manager for cartridge and disc images",
    long_about = "romdock catalogs cartridge and disc images and synchronizes them,\n\
                  their save files, and cached artwork to handheld devices mounted\n\
                  as plain directories."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Settings file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of styled output
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy titles to a device profile
    Sync {
        /// Profile identifier
        profile: String,
        /// Restrict to these title ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        titles: Vec<TitleId>,
        /// Reconcile save files per title
        #[arg(long)]
        saves: bool,
        /// Decide and count copies without touching the device
        #[arg(long)]
        dry_run: bool,
    },
    /// Copy cached artwork to a device profile
    Artwork {
        /// Profile identifier
        profile: String,
        /// Restrict to these title ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        titles: Vec<TitleId>,
        /// Artwork kinds to copy (comma separated)
        #[arg(long, value_delimiter = ',', default_value = "boxart")]
        kinds: Vec<String>,
    },
    /// Check that a profile's device root is reachable
    Verify {
        /// Profile identifier
        profile: String,
    },
    /// List device titles missing from the catalog
    Scan {
        /// Profile identifier
        profile: String,
    },
    /// Import device titles into the catalog
    Import {
        /// Profile identifier
        profile: String,
        /// Device paths to import
        paths: Vec<PathBuf>,
    },
    /// Show the catalog-wide sync status
    Status,
    /// Show or purge the sync history
    History {
        /// Maximum rows to show
        #[arg(long)]
        limit: Option<u32>,
        /// Restrict to one profile
        #[arg(long)]
        profile: Option<String>,
        /// Delete rows older than this many days
        #[arg(long, conflicts_with = "purge_all")]
        purge_days: Option<i64>,
        /// Delete every history row
        #[arg(long)]
        purge_all: bool,
    },
    /// List configured sync profiles
    Profiles,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug, cli.quiet, cli.verbose)?;

    info!("romdock v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = match &cli.config {
        Some(path) => SettingsManager::load(path.clone())?,
        None => SettingsManager::load_default()?,
    };
    let layout = settings.settings().layout()?;
    layout.ensure().context("preparing data directory")?;
    let catalog = SqliteCatalog::open(layout.catalog_file())?;

    match cli.command {
        Commands::Sync {
            profile,
            titles,
            saves,
            dry_run,
        } => {
            sync_command(
                &settings, &catalog, &layout, &profile, &titles, saves, dry_run, cli.quiet,
                cli.json,
            )
            .await?;
        }
        Commands::Artwork {
            profile,
            titles,
            kinds,
        } => {
            artwork_command(&settings, &catalog, &layout, &profile, &titles, &kinds, cli.json)
                .await?;
        }
        Commands::Verify { profile } => {
            verify_command(&settings, &profile, cli.json).await?;
        }
        Commands::Scan { profile } => {
            scan_command(&settings, &catalog, &layout, &profile, cli.json).await?;
        }
        Commands::Import { profile, paths } => {
            import_command(&settings, &catalog, &layout, &profile, &paths, cli.json).await?;
        }
        Commands::Status => {
            status_command(&catalog, cli.json)?;
        }
        Commands::History {
            limit,
            profile,
            purge_days,
            purge_all,
        } => {
            history_command(&catalog, limit, profile.as_deref(), purge_days, purge_all, cli.json)?;
        }
        Commands::Profiles => {
            profiles_command(&settings, cli.json)?;
        }
    }

    Ok(())
}

fn init_logging(debug: bool, quiet: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap();

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn require_profile(settings: &SettingsManager, id: &str) -> Result<SyncProfile> {
    settings
        .profile(id)?
        .with_context(|| format!("profile '{id}' not found; see `romdock profiles`"))
}

/// Resolve the batch for a run: the caller's selection in the given order,
/// or the whole catalog in its iteration order.
fn select_titles(catalog: &SqliteCatalog, ids: &[TitleId]) -> Result<Vec<Title>> {
    if ids.is_empty() {
        return Ok(catalog.titles(&TitleFilter::default())?);
    }
    let mut titles = Vec::with_capacity(ids.len());
    for id in ids {
        match catalog.title(*id)? {
            Some(title) => titles.push(title),
            None => bail!("no title with id {id}"),
        }
    }
    Ok(titles)
}

#[allow(clippy::too_many_arguments)]
async fn sync_command(
    settings: &SettingsManager,
    catalog: &SqliteCatalog,
    layout: &DataLayout,
    profile_id: &str,
    title_ids: &[TitleId],
    saves: bool,
    dry_run: bool,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let profile = require_profile(settings, profile_id)?;
    let titles = select_titles(catalog, title_ids)?;

    if !quiet && !json {
        println!(
            "{} Syncing {} title(s) to {}",
            style("→").green().bold(),
            titles.len(),
            style(&profile.name).cyan()
        );
        if dry_run {
            println!(
                "{} Dry run mode - no changes will be made",
                style("ℹ").yellow()
            );
        }
    }

    let options = TransferOptions {
        sync_saves: saves,
        dry_run,
        operation: if title_ids.is_empty() {
            OperationKind::SyncAll
        } else {
            OperationKind::SyncSelected
        },
    };

    let bar = SyncProgressBar::new(titles.len() as u64, quiet || json);
    let engine = TransferEngine::new(catalog, layout.clone());
    let report = engine
        .transfer_titles(&profile, &titles, &options, &bar)
        .await?;
    bar.finish("Sync complete");

    if json {
        json_output::print_json("sync", Some(profile_id), &report);
    } else if !quiet {
        display::print_transfer_report(&report);
    }
    Ok(())
}

async fn artwork_command(
    settings: &SettingsManager,
    catalog: &SqliteCatalog,
    layout: &DataLayout,
    profile_id: &str,
    title_ids: &[TitleId],
    kind_names: &[String],
    json: bool,
) -> Result<()> {
    let profile = require_profile(settings, profile_id)?;
    let titles = select_titles(catalog, title_ids)?;

    let mut kinds = Vec::with_capacity(kind_names.len());
    for name in kind_names {
        match ArtworkKind::parse(name) {
            Some(kind) => kinds.push(kind),
            None => bail!("unknown artwork kind '{name}'"),
        }
    }

    let engine = ArtworkSyncEngine::new(catalog, layout.clone(), settings.settings().artwork.clone());
    let report = engine.sync_artwork(&profile, &titles, &kinds).await?;

    if json {
        json_output::print_json("artwork", Some(profile_id), &report);
    } else {
        display::print_artwork_report(&report);
    }
    Ok(())
}

async fn verify_command(settings: &SettingsManager, profile_id: &str, json: bool) -> Result<()> {
    let profile = require_profile(settings, profile_id)?;
    let check = PathResolver::check(&profile).await;

    if json {
        json_output::print_json("verify", Some(profile_id), &check);
    } else {
        display::print_profile_check(&profile, &check);
    }
    if !check.valid {
        std::process::exit(1);
    }
    Ok(())
}

async fn scan_command(
    settings: &SettingsManager,
    catalog: &SqliteCatalog,
    layout: &DataLayout,
    profile_id: &str,
    json: bool,
) -> Result<()> {
    let profile = require_profile(settings, profile_id)?;
    let scanner = DeviceScanner::new(catalog, layout.clone());
    let candidates = scanner.scan_for_uncataloged(&profile).await?;

    if json {
        json_output::print_json("scan", Some(profile_id), &candidates);
    } else {
        display::print_candidates(&candidates);
    }
    Ok(())
}

async fn import_command(
    settings: &SettingsManager,
    catalog: &SqliteCatalog,
    layout: &DataLayout,
    profile_id: &str,
    paths: &[PathBuf],
    json: bool,
) -> Result<()> {
    if paths.is_empty() {
        bail!("no paths given; run `romdock scan {profile_id}` to list candidates");
    }
    let profile = require_profile(settings, profile_id)?;
    let scanner = DeviceScanner::new(catalog, layout.clone());
    let report = scanner.import_candidates(&profile, paths).await?;

    if json {
        json_output::print_json("import", Some(profile_id), &report);
    } else {
        display::print_import_report(&report);
    }
    Ok(())
}

fn status_command(catalog: &SqliteCatalog, json: bool) -> Result<()> {
    let status = catalog.library_status()?;
    if json {
        json_output::print_json("status", None, &status);
    } else {
        display::print_library_status(&status);
    }
    Ok(())
}

fn history_command(
    catalog: &SqliteCatalog,
    limit: Option<u32>,
    profile: Option<&str>,
    purge_days: Option<i64>,
    purge_all: bool,
    json: bool,
) -> Result<()> {
    if purge_all {
        let removed = catalog.purge_history_all()?;
        println!("{} Removed {removed} history row(s)", style("✓").green());
        return Ok(());
    }
    if let Some(days) = purge_days {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
        let removed = catalog.purge_history_before(cutoff)?;
        println!(
            "{} Removed {removed} history row(s) older than {days} day(s)",
            style("✓").green()
        );
        return Ok(());
    }

    let rows = catalog.history(limit.or(Some(20)), profile)?;
    if json {
        json_output::print_json("history", profile, &rows);
    } else {
        display::print_history(&rows);
    }
    Ok(())
}

fn profiles_command(settings: &SettingsManager, json: bool) -> Result<()> {
    let profiles = settings.profiles()?;
    if json {
        json_output::print_json("profiles", None, &profiles);
    } else {
        display::print_profiles(&profiles);
    }
    Ok(())
}
