//! Core type system and error handling for romdock
//!
//! This crate provides the foundational types, error handling, and shared
//! contracts used throughout the romdock workspace. It includes:
//!
//! - **Error handling**: Structured error types with fatal/per-item
//!   classification
//! - **Records**: Titles, save records, sync profiles, and audit rows
//! - **Reports**: Per-invocation result shapes and progress events
//! - **Traits**: Store contracts and the artwork fetcher collaborator
//!
//! # Examples
//!
//! ```rust
//! use romdock_types::{Error, Result, TransferReport};
//!
//! fn example_run() -> Result<TransferReport> {
//!     let mut report = TransferReport::new(uuid::Uuid::new_v4(), 2);
//!     report.synced = 2;
//!     Ok(report)
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod model;
pub mod report;
pub mod result;
pub mod traits;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use model::*;
pub use report::*;
pub use result::Result;
pub use traits::*;
