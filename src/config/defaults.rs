//! Default values for configuration

/// Environment variable naming the database file, overriding the config
pub const DB_FILE_ENV: &str = "WELEARN_DB_FILE";

/// Database file name set through [`DB_FILE_ENV`], if any
pub fn database_file_override() -> Option<String> {
    std::env::var(DB_FILE_ENV)
        .ok()
        .filter(|name| !name.trim().is_empty())
}

/// Default database file name inside the base directory
pub fn default_database_file_name() -> String {
    database_file_override().unwrap_or_else(|| "welearn.db".to_string())
}

/// Default maximum pooled connections
pub fn default_max_connections() -> u32 {
    5
}

/// Default: enforce foreign keys
pub fn default_foreign_keys() -> bool {
    true
}

/// Default busy timeout in seconds
pub fn default_busy_timeout_secs() -> u64 {
    5
}

/// Default minimum length of a document's sanitized full content
pub fn default_min_content_length() -> usize {
    25
}
