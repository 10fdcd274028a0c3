//! Device synchronization engine for romdock
//!
//! This crate is the core of romdock: it decides, for a given sync
//! profile, which titles and save files must be copied, in which
//! direction, and records the outcome. It tolerates partial failure
//! without losing already-copied data and stays resumable and idempotent
//! across repeated invocations against an unreliable removable
//! filesystem.
//!
//! Components:
//!
//! - [`PathResolver`]: system tag to device folder mapping and device
//!   root reachability
//! - [`TransferEngine`]: one-directional library-to-device title copies
//! - [`ArtworkResolver`] / [`ArtworkSyncEngine`]: boxart variant selection
//!   and verbatim artwork copies
//! - [`DeviceScanner`]: reverse scan for uncataloged device titles and
//!   import-from-device
//! - [`AuditRecorder`]: one immutable history row per transfer run
//!
//! The two-way save reconciliation lives in `romdock-saves` and is chained
//! per title by the transfer engine.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod artwork;
pub mod engine;
pub mod history;
pub mod resolver;
pub mod scanner;

pub use artwork::{ArtworkResolver, ArtworkSyncEngine};
pub use engine::{TransferEngine, TransferOptions};
pub use history::{AuditRecorder, MAX_DETAILED_ERRORS};
pub use resolver::PathResolver;
pub use scanner::{DeviceScanner, TITLE_EXTENSIONS};
