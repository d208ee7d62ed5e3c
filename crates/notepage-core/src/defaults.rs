//! Centralized default constants for notepage.
//!
//! Every crate references these instead of defining its own magic numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for cursor pagination (`limit`).
pub const DEFAULT_LIMIT: i64 = 30;

/// Default page size for offset pagination (`page_size`).
pub const DEFAULT_PAGE_SIZE: i64 = 30;

/// Default 1-based page number for offset pagination.
pub const DEFAULT_PAGE: i64 = 1;

/// Smallest accepted page size for both strategies.
pub const MIN_PAGE_SIZE: i64 = 1;

/// Largest accepted page size for both strategies.
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// SCHEMA LIMITS
// =============================================================================

/// Maximum length of a note's text.
pub const NOTE_MAX_LEN: usize = 500;

/// Maximum length of a user's display name.
pub const USER_NAME_MAX_LEN: usize = 20;

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const SERVER_PORT: u16 = 3000;

/// Default per-request timeout in seconds. In-flight queries are dropped when it fires.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_bounds() {
        assert!((MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&DEFAULT_LIMIT));
        assert!((MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&DEFAULT_PAGE_SIZE));
        assert!(DEFAULT_PAGE >= 1);
    }
}
