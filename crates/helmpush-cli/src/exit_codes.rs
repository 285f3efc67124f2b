//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions where applicable. Argument
//! parsing errors exit with 2 from clap itself.

/// Success - chart accepted by the repository
pub const SUCCESS: i32 = 0;

/// Input error - unknown repository or malformed destination
pub const INPUT_ERROR: i32 = 2;

/// Remote rejected - the repository answered with a non-success status
pub const REMOTE_REJECTED: i32 = 3;

/// Chart error - chart could not be loaded or packaged
pub const CHART_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Network error - no usable response from the repository
pub const NETWORK_ERROR: i32 = 6;
