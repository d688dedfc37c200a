//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    Defaults,
    DefaultsSummary,
    LingualizerConfig,
    PROJECT_PLACEHOLDER,
    loader,
};

/// Owns the effective defaults and derives translation file locations from them.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    defaults: Defaults,

    /// Configuration discovered on disk, applied by `update_defaults(None)`
    file_config: Option<LingualizerConfig>,

    /// Path of the discovered configuration file
    config_path: Option<PathBuf>,

    /// Project root before any `cwd` override
    base_root: PathBuf,
}

impl ConfigManager {
    /// Creates a manager with built-in defaults rooted at `project_root`.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            defaults: Defaults::default(),
            file_config: None,
            config_path: None,
            base_root: project_root.into(),
        }
    }

    /// Looks for `.lingualizerrc` / `.lingualizerrc.json` from `start_dir` upwards
    /// and applies it on top of the built-in defaults.
    ///
    /// The directory holding the configuration file becomes the project root;
    /// without a configuration file `start_dir` is used.
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn discover(start_dir: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Discovering configuration from: {:?}", start_dir);

        let Some((config_path, config)) = loader::load_nearest(start_dir)? else {
            return Ok(Self::new(start_dir));
        };

        let base_root =
            config_path.parent().map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
        let mut manager = Self {
            defaults: Defaults::default(),
            file_config: Some(config),
            config_path: Some(config_path),
            base_root,
        };
        manager.update_defaults(None)?;

        Ok(manager)
    }

    /// Merges `config` into the current defaults.
    ///
    /// With `None` the discovered file configuration is used; if there is none
    /// this is a no-op. Absent keys keep their current values.
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn update_defaults(
        &mut self,
        config: Option<&LingualizerConfig>,
    ) -> Result<(), ConfigError> {
        let Some(config) = config.or(self.file_config.as_ref()) else {
            tracing::debug!("No configuration to apply");
            return Ok(());
        };

        let merged = self.defaults.merged(config).map_err(ConfigError::ValidationErrors)?;
        tracing::debug!("Defaults updated: {:?}", merged);
        self.defaults = merged;

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    #[must_use]
    pub const fn file_config(&self) -> Option<&LingualizerConfig> {
        self.file_config.as_ref()
    }

    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Project root, honoring the `cwd` override (relative values resolve against
    /// the discovered root).
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        self.defaults
            .cwd
            .as_ref()
            .map_or_else(|| self.base_root.clone(), |cwd| self.base_root.join(cwd))
    }

    /// `<project root>/<localizationDirName>`
    #[must_use]
    pub fn localization_dir(&self) -> PathBuf {
        self.project_root().join(&self.defaults.localization_dir_name)
    }

    /// Base name of the translation files with `%project%` expanded.
    ///
    /// # Errors
    /// - The name uses `%project%` but the project root has no directory name
    pub fn base_file_name(&self) -> Result<String, ConfigError> {
        let name = &self.defaults.translation_file_name;
        if !name.contains(PROJECT_PLACEHOLDER) {
            return Ok(name.clone());
        }

        let root = self.project_root();
        // `<root>/..` has no file name of its own
        let root = match root.file_name() {
            Some(_) => root,
            None => root.canonicalize().unwrap_or(root),
        };
        let project = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConfigError::ProjectNameUnavailable(root.clone()))?;

        Ok(name.replace(PROJECT_PLACEHOLDER, &project))
    }

    /// Summary of the effective defaults (falls back to the raw file name when
    /// `%project%` cannot be expanded).
    #[must_use]
    pub fn summary(&self) -> DefaultsSummary {
        DefaultsSummary {
            locale: self.defaults.default_locale,
            directory: self.defaults.localization_dir_name.clone(),
            file: self
                .base_file_name()
                .unwrap_or_else(|_| self.defaults.translation_file_name.clone()),
            ext: self.defaults.translation_file_ext.clone(),
        }
    }
}
