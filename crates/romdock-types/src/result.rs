//! Result type alias for romdock operations

use crate::Error;

/// Result type alias for romdock operations
pub type Result<T> = std::result::Result<T, Error>;
