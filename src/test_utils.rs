//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される翻訳ファイルのフィクスチャを提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use crate::config::ConfigManager;
use crate::locale::Locale;
use crate::store::TranslationStore;

/// Project directory name, and therefore the expanded `%project%` base file name
const PROJECT_NAME: &str = "app";

/// A temporary project `<tmp>/app` with an empty `localization` directory.
pub(crate) struct LocalizationFixture {
    /// Owns the temporary directory for the fixture's lifetime
    temp_dir: TempDir,
}

impl LocalizationFixture {
    /// Creates `<tmp>/app/localization`.
    pub(crate) fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(PROJECT_NAME).join("localization")).unwrap();
        Self { temp_dir }
    }

    /// `<tmp>/app`
    pub(crate) fn project_dir(&self) -> PathBuf {
        self.temp_dir.path().join(PROJECT_NAME)
    }

    /// `<tmp>/app/localization`
    pub(crate) fn localization_dir(&self) -> PathBuf {
        self.project_dir().join("localization")
    }

    /// Directory name of the project
    pub(crate) const fn project_name(&self) -> &'static str {
        PROJECT_NAME
    }

    /// Writes `app.json`.
    pub(crate) fn with_default(self, table: Value) -> Self {
        fs::write(self.localization_dir().join(format!("{PROJECT_NAME}.json")), table.to_string())
            .unwrap();
        self
    }

    /// Writes `app.<locale>.json`.
    pub(crate) fn with_locale(self, locale: Locale, table: Value) -> Self {
        fs::write(self.locale_file(locale), table.to_string()).unwrap();
        self
    }

    /// Deletes `app.<locale>.json`.
    pub(crate) fn remove_locale(&self, locale: Locale) {
        fs::remove_file(self.locale_file(locale)).unwrap();
    }

    /// Deletes the localization directory.
    pub(crate) fn remove_dir(&self) {
        fs::remove_dir_all(self.localization_dir()).unwrap();
    }

    /// Built-in defaults rooted at the project directory.
    pub(crate) fn config(&self) -> ConfigManager {
        ConfigManager::new(self.project_dir())
    }

    /// A loaded store serving the default locale.
    pub(crate) fn store(&self) -> TranslationStore {
        TranslationStore::new(self.config()).unwrap()
    }

    /// `app.<locale>.json` inside the localization directory
    fn locale_file(&self, locale: Locale) -> PathBuf {
        self.localization_dir().join(format!("{PROJECT_NAME}.{}.json", locale.tag()))
    }
}
