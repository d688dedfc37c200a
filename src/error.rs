//! Error types for table loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::locale::Locale;

/// Errors raised while loading translation tables.
///
/// All of them are deployment problems (missing directory, missing or broken
/// file) and are never retried.
#[derive(Error, Debug)]
pub enum LingualizerError {
    /// The localization directory does not exist
    #[error("Unable to find a translations directory at {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A required translation file (default table, or the requested locale) is absent
    #[error("Unable to find a translations file for '{locale}' at {}", .path.display())]
    TranslationFileNotFound { locale: Locale, path: PathBuf },

    #[error("Failed to parse translations file {}: {source}", .path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but its root is not a JSON object
    #[error("Translations file {} must contain a JSON object", .path.display())]
    NotATable { path: PathBuf },

    #[error("Failed to read translations file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
