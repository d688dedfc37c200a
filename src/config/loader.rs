//! Configuration file discovery.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    LingualizerConfig,
};

/// Recognized configuration file names, in lookup order.
pub(super) const CONFIG_FILE_NAMES: [&str; 2] = [".lingualizerrc", ".lingualizerrc.json"];

/// Finds the nearest configuration file, walking up from `start_dir`.
///
/// In each directory the names of [`CONFIG_FILE_NAMES`] are tried in order;
/// the first existing file wins.
pub(super) fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
    })
}

/// Loads the nearest configuration file above `start_dir`.
///
/// # Returns
/// - `Ok(Some((path, config)))`: a configuration file was found and parsed
/// - `Ok(None)`: no configuration file exists in `start_dir` or its ancestors
/// - `Err(ConfigError)`: the file could not be read or parsed
pub(super) fn load_nearest(
    start_dir: &Path,
) -> Result<Option<(PathBuf, LingualizerConfig)>, ConfigError> {
    let Some(config_path) = find_config_file(start_dir) else {
        tracing::debug!("Configuration file not found above: {:?}", start_dir);
        return Ok(None);
    };

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let config: LingualizerConfig = serde_json::from_str(&content)?;

    Ok(Some((config_path, config)))
}
