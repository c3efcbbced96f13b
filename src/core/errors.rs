use std::path::PathBuf;

/// All domain errors for rowlog.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum RowlogError {
    #[error(
        "Config file not found: {path}\n\n  \
         Check that the path is correct and the file exists.\n  \
         A minimal config:\n    \
         [rowlog]\n    \
         enabled = true\n    \
         locale = \"en\""
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "Unknown locale '{name}'\n\n  \
         Built-in template sets: {available}\n  \
         Use [templates] in the config file to override individual templates."
    )]
    UnknownLocale { name: String, available: String },

    #[error(
        "Invalid template for '{slot}': {detail}\n\n  \
         Placeholders are written as {{name}}. Valid placeholders for this slot: {allowed}"
    )]
    InvalidTemplate {
        slot: String,
        detail: String,
        allowed: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RowlogError>;
