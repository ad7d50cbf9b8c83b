//! Centralized default constants for grind.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for the problem listing.
pub const PAGE_SIZE: i64 = 12;

/// Maximum accepted page size.
pub const PAGE_SIZE_MAX: i64 = 100;

/// Default result limit for title search.
pub const SEARCH_LIMIT: i64 = 20;

// =============================================================================
// TAGS
// =============================================================================

/// Maximum tag name length in characters.
pub const TAG_NAME_MAX_LENGTH: usize = 100;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum request body size in bytes (2 MB, payloads are Markdown text).
pub const MAX_BODY_SIZE_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// INFERENCE
// =============================================================================

/// Provider used when an enhancement request does not name one.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Environment variable overriding the default provider.
pub const ENV_ENHANCE_PROVIDER: &str = "ENHANCE_PROVIDER";

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Environment variable for the Gemini API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Environment variable overriding the Gemini base URL.
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

/// Environment variable overriding the Gemini model.
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Environment variable for the Z.AI API key.
pub const ENV_ZAI_API_KEY: &str = "ZAI_API_KEY";

/// Environment variable overriding the Z.AI base URL.
pub const ENV_ZAI_BASE_URL: &str = "ZAI_BASE_URL";

/// Environment variable overriding the Z.AI model.
pub const ENV_ZAI_MODEL: &str = "ZAI_MODEL";

/// Default Z.AI API base URL (OpenAI-compatible).
pub const DEFAULT_ZAI_BASE_URL: &str = "https://api.z.ai/api/paas/v4";

/// Default Z.AI model.
pub const DEFAULT_ZAI_MODEL: &str = "glm-4.5-flash";

// =============================================================================
// IMPORT
// =============================================================================

/// Default directory scanned for solution files.
pub const IMPORT_DIR: &str = "solutions";
