//! Reading translation tables from the localization directory.

use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;

use super::TranslationTable;
use crate::config::ConfigManager;
use crate::error::LingualizerError;
use crate::locale::Locale;

/// Locations of the translation files for one set of defaults.
///
/// `<dir>/<base>.<ext>` holds the default-locale table and
/// `<dir>/<base>.<locale>.<ext>` the table of any other locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFiles {
    /// Localization directory
    dir: PathBuf,
    /// File name without locale or extension
    base_name: String,
    /// Extension without the leading dot
    ext: String,
}

impl TranslationFiles {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>, ext: impl Into<String>) -> Self {
        Self { dir: dir.into(), base_name: base_name.into(), ext: ext.into() }
    }

    /// Resolves the file locations from the current defaults.
    ///
    /// # Errors
    /// - `DirectoryNotFound` if the localization directory does not exist
    /// - `Config` if the base file name cannot be expanded
    pub fn from_config(config: &ConfigManager) -> Result<Self, LingualizerError> {
        let dir = config.localization_dir();
        if !dir.is_dir() {
            return Err(LingualizerError::DirectoryNotFound { path: dir });
        }

        let base_name = config.base_file_name()?;
        Ok(Self::new(dir, base_name, config.defaults().translation_file_ext.clone()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn default_file(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.base_name, self.ext))
    }

    #[must_use]
    pub fn locale_file(&self, locale: Locale) -> PathBuf {
        self.dir.join(format!("{}.{}.{}", self.base_name, locale.tag(), self.ext))
    }
}

/// Tables read for one locale, not yet installed in a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedTables {
    /// `None` when the default file is absent (tolerated for non-default locales)
    pub default_table: Option<TranslationTable>,
    /// `None` when `locale` is the default locale
    pub active_table: Option<TranslationTable>,
}

impl LoadedTables {
    /// Number of tables read, i.e. the number of change notifications owed.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        usize::from(self.default_table.is_some()) + usize::from(self.active_table.is_some())
    }
}

/// Reads the tables needed to serve `locale`.
///
/// The default table is read on every call. It is mandatory only when `locale`
/// is the default locale. A non-default locale always requires its own file;
/// there is no silent fallback to the default table.
///
/// # Errors
/// - `TranslationFileNotFound` for a missing mandatory file
/// - `MalformedJson`, `NotATable`, `Io` from [`load_table`]
pub fn load_tables(
    files: &TranslationFiles,
    default_locale: Locale,
    locale: Locale,
) -> Result<LoadedTables, LingualizerError> {
    let is_default = locale == default_locale;

    let default_path = files.default_file();
    let default_table = if default_path.exists() {
        Some(load_table(&default_path)?)
    } else if is_default {
        return Err(LingualizerError::TranslationFileNotFound { locale, path: default_path });
    } else {
        tracing::warn!(
            path = %default_path.display(),
            "Default translations file not found, serving '{locale}' without fallback"
        );
        None
    };

    let active_table = if is_default {
        None
    } else {
        let locale_path = files.locale_file(locale);
        if !locale_path.exists() {
            return Err(LingualizerError::TranslationFileNotFound { locale, path: locale_path });
        }
        Some(load_table(&locale_path)?)
    };

    Ok(LoadedTables { default_table, active_table })
}

/// Reads and parses one translation file.
///
/// # Errors
/// - `Io` if the file cannot be read
/// - `MalformedJson` if it is not valid JSON
/// - `NotATable` if the JSON root is not an object
pub fn load_table(path: &Path) -> Result<TranslationTable, LingualizerError> {
    tracing::debug!("Loading translations from: {:?}", path);

    let content = std::fs::read_to_string(path)
        .map_err(|source| LingualizerError::Io { path: path.to_path_buf(), source })?;

    let json: Value = serde_json::from_str(&content)
        .map_err(|source| LingualizerError::MalformedJson { path: path.to_path_buf(), source })?;

    TranslationTable::from_json(json)
        .ok_or_else(|| LingualizerError::NotATable { path: path.to_path_buf() })
}
