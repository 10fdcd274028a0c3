//! Two-way save file synchronization for romdock
//!
//! Per-title reconciliation between the local save store and a device's
//! mapped folders. Each direction is decided independently with a
//! newer-wins rule; copies preserve source modification times so repeated
//! passes converge to skips.
//!
//! # Examples
//!
//! ```rust,no_run
//! use romdock_catalog::SqliteCatalog;
//! use romdock_saves::SaveSyncEngine;
//! # async fn example(title: romdock_types::Title) -> romdock_types::Result<()> {
//! let catalog = SqliteCatalog::open_in_memory()?;
//! let engine = SaveSyncEngine::new(&catalog, "/data/romdock/saves".into());
//! let report = engine
//!     .sync_both_ways(&title, std::path::Path::new("/media/device"), "SFC")
//!     .await;
//! println!("{} save(s) copied", report.total().copied);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod extensions;

pub use engine::{SaveCandidate, SaveSyncEngine};
pub use extensions::{save_extensions, save_type_label};
