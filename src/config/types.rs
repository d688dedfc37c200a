use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale::Locale;

/// Placeholder in the translation file name replaced by the project directory name.
pub const PROJECT_PLACEHOLDER: &str = "%project%";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFileExt")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Cannot expand '%project%': project root {0:?} has no directory name")]
    ProjectNameUnavailable(std::path::PathBuf),
}

/// 複数のバリデーションエラーを番号付きリストに整形
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of a `.lingualizerrc` file.
///
/// Every field is optional: absent keys leave the current defaults untouched.
/// The misspelled keys written by older releases are still accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LingualizerConfig {
    pub default_locale: Option<String>,

    #[serde(alias = "defaulLocalizationDirName", alias = "defaultLocalizationDirName")]
    pub localization_dir_name: Option<String>,

    /// Base name of the translation files. `%project%` expands to the project directory name.
    #[serde(alias = "defaultranslationFileName", alias = "defaultTranslationFileName")]
    pub translation_file_name: Option<String>,

    #[serde(alias = "defaultranslationFileExt", alias = "defaultTranslationFileExt")]
    pub translation_file_ext: Option<String>,

    /// Overrides the project root used to locate the localization directory.
    pub cwd: Option<String>,

    pub key_separator: Option<String>,
}

/// Effective settings used to locate and read translation tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    pub default_locale: Locale,
    pub localization_dir_name: String,
    pub translation_file_name: String,
    pub translation_file_ext: String,
    pub cwd: Option<String>,
    pub key_separator: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            localization_dir_name: "localization".to_string(),
            translation_file_name: PROJECT_PLACEHOLDER.to_string(),
            translation_file_ext: "json".to_string(),
            cwd: None,
            key_separator: ".".to_string(),
        }
    }
}

/// Keeps a config value only if it carries something (empty strings count as unset).
fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl Defaults {
    /// Returns a copy of `self` with every present key of `config` applied.
    ///
    /// # Errors
    /// - `defaultLocale` is not a supported locale
    /// - The merged settings fail [`Defaults::validate`]
    pub fn merged(&self, config: &LingualizerConfig) -> Result<Self, Vec<ValidationError>> {
        let mut merged = self.clone();
        let mut errors = Vec::new();

        if let Some(tag) = present(config.default_locale.as_ref()) {
            match tag.parse::<Locale>() {
                Ok(locale) => merged.default_locale = locale,
                Err(e) => errors.push(ValidationError::new(
                    "defaultLocale",
                    format!("{e}. Supported locales: {}", supported_tags()),
                )),
            }
        }
        if let Some(name) = present(config.localization_dir_name.as_ref()) {
            merged.localization_dir_name = name.to_string();
        }
        if let Some(name) = present(config.translation_file_name.as_ref()) {
            merged.translation_file_name = name.to_string();
        }
        if let Some(ext) = present(config.translation_file_ext.as_ref()) {
            merged.translation_file_ext = ext.trim_start_matches('.').to_string();
        }
        if let Some(cwd) = present(config.cwd.as_ref()) {
            merged.cwd = Some(cwd.to_string());
        }
        if let Some(separator) = present(config.key_separator.as_ref()) {
            merged.key_separator = separator.to_string();
        }

        if let Err(validation) = merged.validate() {
            errors.extend(validation);
        }

        if errors.is_empty() { Ok(merged) } else { Err(errors) }
    }

    /// # Errors
    /// - Required field is empty
    /// - A file or directory name contains a path separator
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (field_path, value) in [
            ("localizationDirName", &self.localization_dir_name),
            ("translationFileName", &self.translation_file_name),
            ("translationFileExt", &self.translation_file_ext),
        ] {
            if value.is_empty() {
                errors.push(ValidationError::new(field_path, "The value cannot be empty"));
            } else if value.contains(['/', '\\']) {
                errors.push(ValidationError::new(
                    field_path,
                    format!("'{value}' must be a single name, not a path"),
                ));
            }
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Comma separated list of every supported tag
fn supported_tags() -> String {
    Locale::ALL.iter().map(|l| l.tag()).collect::<Vec<_>>().join(", ")
}

/// One-line summary of the defaults, as printed by `print_defaults`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultsSummary {
    pub locale: Locale,
    pub directory: String,
    pub file: String,
    pub ext: String,
}

impl fmt::Display for DefaultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lingualizer-> Default Settings locale: {} directory: {} file: {} ext: '{}'",
            self.locale, self.directory, self.file, self.ext
        )
    }
}
