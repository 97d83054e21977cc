// =============================================================================
// Application Identity
// =============================================================================

/// Application name (for display)
pub const APP_NAME: &str = "jlsql";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".jsonlogic-sql";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "jlsql.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "JLSQL_CONFIG";

// =============================================================================
// Environment Variables - Compilation
// =============================================================================

/// Environment variable for the target SQL dialect
pub const ENV_DIALECT: &str = "JLSQL_DIALECT";

/// Environment variable for the schema file path
pub const ENV_SCHEMA: &str = "JLSQL_SCHEMA";

/// Environment variable for the maximum expression depth
pub const ENV_MAX_DEPTH: &str = "JLSQL_MAX_DEPTH";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "JLSQL_LOG";

// =============================================================================
// REPL
// =============================================================================

/// Prompt shown before each REPL input line
pub const REPL_PROMPT: &str = "jlsql> ";

/// Argument accepted by `compile` to read the expression from stdin
pub const STDIN_ARG: &str = "-";
