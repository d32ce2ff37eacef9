//! Centralized constants for the Finance Agent CLI
//!
//! Deployment-specific values (platform URL, keys, credentials) come from
//! config.toml or the environment.

// =============================================================================
// Platform Endpoints (relative to the project URL)
// =============================================================================

/// Password sign-in endpoint
pub const AUTH_TOKEN_PATH: &str = "/auth/v1/token?grant_type=password";

/// Database REST prefix
pub const REST_PREFIX: &str = "/rest/v1";

/// Edge function prefix
pub const FUNCTIONS_PREFIX: &str = "/functions/v1";

/// Table holding extracted financial rows
pub const FINANCIAL_DATA_TABLE: &str = "financial_data";

/// Chat tables
pub const CHAT_SESSIONS_TABLE: &str = "chat_sessions";
pub const CHAT_MESSAGES_TABLE: &str = "chat_messages";

/// Edge function names
pub const FN_ASK: &str = "ask";
pub const FN_UPLOAD: &str = "upload";
pub const FN_LIST_DOCUMENTS: &str = "list-documents";
pub const FN_DELETE_DOCUMENT: &str = "delete-document";

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_PLATFORM_URL: &str = "SUPABASE_URL";
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_ACCESS_TOKEN: &str = "FINANCE_AGENT_ACCESS_TOKEN";
pub const ENV_EMAIL: &str = "FINANCE_AGENT_EMAIL";
pub const ENV_PASSWORD: &str = "FINANCE_AGENT_PASSWORD";

// =============================================================================
// Limits
// =============================================================================

/// Rows pulled from financial_data for the dashboard
pub const DEFAULT_FETCH_LIMIT: usize = 100;

/// Page size for the document list
pub const DEFAULT_DOCUMENT_LIMIT: usize = 50;

/// Largest file the upload function accepts (50 MB)
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

// =============================================================================
// File Names
// =============================================================================

/// Default config file path
pub const CONFIG_FILE: &str = "config.toml";

/// Category totals CSV filename
pub const CATEGORY_TOTALS_FILENAME: &str = "category_totals.csv";

/// Daily income/expense CSV filename
pub const TIME_BUCKETS_FILENAME: &str = "time_buckets.csv";

/// Grand totals CSV filename
pub const TOTALS_FILENAME: &str = "totals.csv";
