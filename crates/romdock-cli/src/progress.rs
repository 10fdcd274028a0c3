//! Terminal progress reporting for sync runs

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use romdock_types::{ProgressEvent, ProgressSink, TransferStatus};
use std::time::Duration;

/// Progress bar fed by the transfer engine's per-title events
pub struct SyncProgressBar {
    bar: Option<ProgressBar>,
}

impl SyncProgressBar {
    /// Create a progress bar for a batch of the given size.
    ///
    /// Quiet mode suppresses the bar entirely.
    pub fn new(total: u64, quiet: bool) -> Self {
        let bar = if quiet {
            None
        } else {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {msg} [{wide_bar:.cyan/blue}] {pos}/{len}")
                    .unwrap()
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        };
        Self { bar }
    }

    /// Finish the bar with a closing message
    pub fn finish(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }
}

impl ProgressSink for SyncProgressBar {
    fn report(&self, event: &ProgressEvent) {
        let Some(bar) = &self.bar else {
            return;
        };
        bar.set_position(u64::from(event.index));

        let marker = match event.status {
            TransferStatus::Copied => style("✓").green(),
            TransferStatus::Skipped => style("·").dim(),
            TransferStatus::Errored => style("✗").red(),
        };
        bar.set_message(format!("{marker} {} ({})", event.title, event.system));

        if event.status == TransferStatus::Errored {
            bar.suspend(|| {
                println!(
                    "{} {} failed",
                    style("✗").red().bold(),
                    style(&event.title).red()
                );
            });
        }
    }
}

/// Format bytes in human-readable form
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Format a duration in human-readable form
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
