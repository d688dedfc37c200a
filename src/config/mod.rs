//! Configuration: `.lingualizerrc` discovery and the effective defaults.
mod loader;
mod manager;
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    Defaults,
    DefaultsSummary,
    LingualizerConfig,
    PROJECT_PLACEHOLDER,
    ValidationError,
};
