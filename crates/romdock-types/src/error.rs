//! Error types and handling for romdock
//!
//! This module provides the error taxonomy shared by every romdock crate.
//! Fatal conditions abort an engine invocation before any file is touched;
//! per-item conditions are caught at the item boundary and collected into
//! the invocation's report.

use std::path::PathBuf;

/// Main error type for romdock operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// The requested sync profile does not exist
    #[error("Profile not found: {id}")]
    ProfileNotFound {
        /// Identifier that matched no configured profile
        id: String,
    },

    /// The profile is disabled or has no device root configured
    #[error("Profile '{id}' is not enabled or has no device root set")]
    ProfileDisabled {
        /// Identifier of the disabled profile
        id: String,
    },

    /// The profile's device root does not exist or is not accessible
    #[error("Device root does not exist: {path}")]
    ProfileUnreachable {
        /// The unreachable device root
        path: PathBuf,
    },

    /// The profile has no folder mapping for a title's system tag
    #[error("No folder mapping for system: {system}")]
    NoFolderMapping {
        /// System tag with no mapping entry
        system: String,
    },

    /// A file copy failed
    #[error("Failed to copy '{source_path}' to '{destination}': {message}")]
    CopyFailed {
        /// Source path of the failed copy
        source_path: PathBuf,
        /// Destination path of the failed copy
        destination: PathBuf,
        /// Underlying I/O error message
        message: String,
    },

    /// Save file discovery failed for one title
    #[error("Save discovery failed: {message}")]
    SaveDiscovery {
        /// Error message describing the discovery failure
        message: String,
    },

    /// Catalog store error
    #[error("Catalog error: {message}")]
    Catalog {
        /// Error message from the catalog store
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors
    Io,
    /// Profile lookup and pre-flight errors
    Profile,
    /// Missing system-to-folder mapping
    Mapping,
    /// File copy errors
    Copy,
    /// Save discovery errors
    SaveDiscovery,
    /// Catalog store errors
    Catalog,
    /// Configuration errors
    Config,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::ProfileNotFound { .. }
            | Self::ProfileDisabled { .. }
            | Self::ProfileUnreachable { .. } => ErrorKind::Profile,
            Self::NoFolderMapping { .. } => ErrorKind::Mapping,
            Self::CopyFailed { .. } => ErrorKind::Copy,
            Self::SaveDiscovery { .. } => ErrorKind::SaveDiscovery,
            Self::Catalog { .. } => ErrorKind::Catalog,
            Self::Config { .. } => ErrorKind::Config,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Whether this error aborts a whole batch operation.
    ///
    /// Fatal errors surface synchronously to the caller before any state is
    /// mutated. Non-fatal errors are recorded per item and processing
    /// continues with the next item.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::ProfileNotFound { .. }
            | Self::ProfileDisabled { .. }
            | Self::ProfileUnreachable { .. }
            | Self::Config { .. }
            | Self::Catalog { .. } => true,
            Self::Io { .. }
            | Self::NoFolderMapping { .. }
            | Self::CopyFailed { .. }
            | Self::SaveDiscovery { .. }
            | Self::Other { .. } => false,
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new save discovery error
    pub fn save_discovery<S: Into<String>>(message: S) -> Self {
        Self::SaveDiscovery {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
