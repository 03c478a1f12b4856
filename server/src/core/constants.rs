// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Filterkit";

/// Application name in lowercase (for paths, identifiers and log targets)
pub const APP_NAME_LOWER: &str = "filterkit";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".filterkit";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "filterkit.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FILTERKIT_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "FILTERKIT_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "FILTERKIT_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FILTERKIT_LOG";

// =============================================================================
// Environment Variables - Filters
// =============================================================================

/// Environment variable for the parameter naming style (`lookup` or `operator`)
pub const ENV_ALIAS_STYLE: &str = "FILTERKIT_ALIAS_STYLE";

/// Environment variable for the shared sort parameter name
pub const ENV_SORT_PARAM: &str = "FILTERKIT_SORT_PARAM";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

// =============================================================================
// API Paths
// =============================================================================

/// Demo resource path
pub const USERS_PATH: &str = "/api/v1/users";

/// Health check path
pub const HEALTH_PATH: &str = "/api/v1/health";

/// Generated OpenAPI document path
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Swagger UI path
pub const DOCS_PATH: &str = "/api/docs";
