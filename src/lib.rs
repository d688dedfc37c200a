//! lingualizer
//!
//! Locale-aware string lookup backed by JSON translation tables, with fallback
//! from the current locale to the default locale and change notifications.

pub mod config;
pub mod error;
pub mod locale;
pub mod store;
mod test_utils;
pub mod translation;

pub use config::{
    ConfigManager,
    LingualizerConfig,
};
pub use error::LingualizerError;
pub use locale::Locale;
pub use store::{
    LocaleChanged,
    Resolution,
    SharedTranslationStore,
    SubscriptionId,
    TranslationStore,
};
pub use translation::{
    TranslationTable,
    TranslationValue,
};
