//! Styled terminal output for romdock reports

use crate::progress::{format_bytes, format_duration};
use console::style;
use romdock_types::{
    ArtworkReport, CandidateTitle, ImportReport, LibraryStatus, ProfileCheck, SyncHistoryRecord,
    SyncProfile, TransferReport,
};

/// Print the outcome of a title transfer run
pub fn print_transfer_report(report: &TransferReport) {
    println!();
    println!("{}", style("Sync Summary:").bold().underlined());
    println!("  Titles considered: {}", style(report.total).cyan());
    println!("  Copied: {}", style(report.synced).green());
    println!("  Skipped: {}", style(report.skipped).yellow());
    println!(
        "  Errors: {}",
        if report.errored > 0 {
            style(report.errored).red()
        } else {
            style(report.errored).green()
        }
    );
    println!(
        "  Bytes moved: {}",
        style(format_bytes(report.bytes_copied)).green()
    );
    println!(
        "  Duration: {}",
        style(format_duration(report.duration)).blue()
    );

    if let Some(saves) = &report.saves {
        let totals = saves.total();
        println!(
            "  Saves: {} copied ({} to device, {} from device), {} skipped",
            style(totals.copied).green(),
            saves.to_device.copied,
            saves.from_device.copied,
            style(totals.skipped).yellow()
        );
    }

    print_title_errors(&report.errors);
}

/// Print the outcome of an artwork sync run
pub fn print_artwork_report(report: &ArtworkReport) {
    println!();
    println!("{}", style("Artwork Summary:").bold().underlined());
    println!("  Titles considered: {}", style(report.total).cyan());
    println!("  Files copied: {}", style(report.copied).green());
    println!("  Skipped: {}", style(report.skipped).yellow());
    print_title_errors(&report.errors);
}

fn print_title_errors(errors: &[romdock_types::TitleError]) {
    if errors.is_empty() {
        return;
    }
    println!();
    println!("{}", style("Errors:").red().bold());
    for error in errors {
        println!(
            "  {} {}: {}",
            style("✗").red(),
            style(&error.title).cyan(),
            error.error
        );
    }
}

/// Print a profile reachability check result
pub fn print_profile_check(profile: &SyncProfile, check: &ProfileCheck) {
    if check.valid {
        println!(
            "{} Profile '{}' is reachable at {}",
            style("✓").green().bold(),
            style(&profile.name).cyan(),
            style(profile.base_path.display()).cyan()
        );
    } else {
        println!(
            "{} Profile '{}': {}",
            style("✗").red().bold(),
            style(&profile.name).cyan(),
            check.message.as_deref().unwrap_or("invalid")
        );
    }
}

/// Print reverse-scan candidates
pub fn print_candidates(candidates: &[CandidateTitle]) {
    if candidates.is_empty() {
        println!("{} No uncataloged titles found", style("✓").green());
        return;
    }
    println!(
        "{} {} uncataloged title(s):",
        style("→").blue().bold(),
        candidates.len()
    );
    for candidate in candidates {
        println!(
            "  {} ({}, {}) {}",
            style(&candidate.name).cyan(),
            candidate.system,
            format_bytes(candidate.size),
            style(candidate.path.display()).dim()
        );
    }
}

/// Print the outcome of an import run
pub fn print_import_report(report: &ImportReport) {
    println!();
    println!("{}", style("Import Summary:").bold().underlined());
    println!("  Paths considered: {}", style(report.total).cyan());
    println!("  Imported: {}", style(report.imported).green());
    println!("  Already cataloged: {}", style(report.skipped).yellow());
    println!(
        "  Saves pulled: {}",
        style(report.saves.copied).green()
    );
    if !report.errors.is_empty() {
        println!();
        println!("{}", style("Errors:").red().bold());
        for error in &report.errors {
            println!(
                "  {} {}: {}",
                style("✗").red(),
                style(error.path.display()).cyan(),
                error.error
            );
        }
    }
}

/// Print the catalog-wide sync tally
pub fn print_library_status(status: &LibraryStatus) {
    println!("{}", style("Library Status:").bold().underlined());
    println!("  Titles: {}", style(status.total).cyan());
    println!("  Synced: {}", style(status.synced).green());
    println!("  Unsynced: {}", style(status.unsynced).yellow());
}

/// Print sync history rows, newest first
pub fn print_history(rows: &[SyncHistoryRecord]) {
    if rows.is_empty() {
        println!("No sync history recorded");
        return;
    }
    for row in rows {
        let status = match row.status {
            romdock_types::RunStatus::Success => style("success").green(),
            romdock_types::RunStatus::Partial => style("partial").yellow(),
        };
        println!(
            "{} [{}] {} ({}): {} synced, {} skipped, {} errored, {} in {}",
            style(row.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
            status,
            style(&row.profile_name).cyan(),
            row.operation.as_str(),
            row.roms_synced,
            row.roms_skipped,
            row.roms_errored,
            format_bytes(row.bytes_moved),
            format_duration(std::time::Duration::from_millis(row.duration_ms))
        );
        if let Some(summary) = &row.error_summary {
            println!("    {}", style(summary).red().dim());
        }
    }
}

/// Print the configured profile table
pub fn print_profiles(profiles: &[SyncProfile]) {
    for profile in profiles {
        let state = if profile.enabled {
            style("enabled").green()
        } else {
            style("disabled").dim()
        };
        let root = if profile.has_base_path() {
            profile.base_path.display().to_string()
        } else {
            "(no device root)".to_string()
        };
        println!(
            "{} [{}] {} at {} ({} system(s) mapped)",
            style(&profile.id).cyan(),
            state,
            style(&profile.name).bold(),
            style(root).dim(),
            profile.system_mappings.len()
        );
        if let Some(firmware) = &profile.firmware {
            println!("    firmware: {}", style(firmware).dim());
        }
    }
}
