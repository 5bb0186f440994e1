/// Exit codes for squelch
///
/// These exit codes allow users and CI/CD systems to distinguish between
/// different types of failures.
/// Success - Files are up to date, or all needed markers were written
pub const SUCCESS: i32 = 0;

/// Pending changes - A dry run found files that would be rewritten
pub const PENDING_CHANGES: i32 = 1;

/// Tool error - Configuration error, invalid project, or internal error
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{PENDING_CHANGES, SUCCESS, TOOL_ERROR};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with pending changes code (1)
    pub fn pending_changes() -> ! {
        std::process::exit(PENDING_CHANGES);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
