//! Exit codes for the CLI

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// The release run still has significant errors after filtering
pub const RELEASE_FAILED: i32 = 3;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;
