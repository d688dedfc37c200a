//! Translation store: locale state, table loading and key resolution.

mod events;
mod shared;

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

pub use events::{
    ChangeNotifier,
    LocaleChanged,
    LocaleChangedHandler,
    SubscriptionId,
};
pub use shared::SharedTranslationStore;

use crate::config::{
    ConfigManager,
    LingualizerConfig,
};
use crate::error::LingualizerError;
use crate::locale::Locale;
use crate::translation::{
    LoadedTables,
    TranslationFiles,
    TranslationTable,
    TranslationValue,
    load_tables,
};

/// Returned by [`TranslationStore::get`] when no table is loaded.
static EMPTY_TEXT: TranslationValue = TranslationValue::Text(String::new());

/// Outcome of resolving a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Neither the default nor the active table is loaded
    Unloaded,
    /// The key is absent from every loaded table
    Missing,
    Found(&'a TranslationValue),
}

/// Holds the current locale and the tables serving it.
///
/// Lookups consult the active-locale table first and fall back to the
/// default-locale table. Tables are replaced wholesale on every load; a load
/// that fails leaves the locale and both tables untouched.
#[derive(Debug)]
pub struct TranslationStore {
    /// Effective defaults and file locations
    config: ConfigManager,
    /// Locale served by `get`
    current_locale: Locale,
    /// Table of the default locale
    default_table: Option<TranslationTable>,
    /// Table of `current_locale`; `None` while it is the default locale
    active_table: Option<TranslationTable>,
    /// Locale change subscribers
    notifier: ChangeNotifier,
}

impl TranslationStore {
    /// Creates a store serving the default locale and loads its table.
    ///
    /// # Errors
    /// - `DirectoryNotFound` / `TranslationFileNotFound` / parse errors from the initial load
    pub fn new(config: ConfigManager) -> Result<Self, LingualizerError> {
        let mut store = Self::deferred(config);
        let locale = store.current_locale;
        store.load_translations(locale)?;
        Ok(store)
    }

    /// Discovers the configuration from `start_dir` and creates a loaded store.
    ///
    /// # Errors
    /// - `Config` if the configuration file is unreadable or invalid
    /// - Any error of [`TranslationStore::new`]
    pub fn discover(start_dir: &Path) -> Result<Self, LingualizerError> {
        Self::new(ConfigManager::discover(start_dir)?)
    }

    /// Creates a store without reading any file.
    ///
    /// Until [`TranslationStore::load_translations`] succeeds, `get` returns the
    /// empty string for every key. Subscribing before the first load lets
    /// handlers observe it.
    #[must_use]
    pub fn deferred(config: ConfigManager) -> Self {
        let current_locale = config.defaults().default_locale;
        Self {
            config,
            current_locale,
            default_table: None,
            active_table: None,
            notifier: ChangeNotifier::new(),
        }
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.current_locale
    }

    #[must_use]
    pub const fn default_locale(&self) -> Locale {
        self.config.defaults().default_locale
    }

    #[must_use]
    pub fn is_default_locale(&self) -> bool {
        self.current_locale == self.default_locale()
    }

    #[must_use]
    pub const fn config(&self) -> &ConfigManager {
        &self.config
    }

    #[must_use]
    pub const fn default_table(&self) -> Option<&TranslationTable> {
        self.default_table.as_ref()
    }

    #[must_use]
    pub const fn active_table(&self) -> Option<&TranslationTable> {
        self.active_table.as_ref()
    }

    /// Switches to `locale` (`None` meaning the default locale) and reloads.
    ///
    /// Setting the current locale again is a no-op: nothing is read and no
    /// handler runs.
    ///
    /// # Errors
    /// - `TranslationFileNotFound` if `locale` has no translations file
    /// - Any other load error; the store keeps its previous locale and tables
    pub fn set_locale(&mut self, locale: impl Into<Option<Locale>>) -> Result<(), LingualizerError> {
        let new_locale = locale.into().unwrap_or_else(|| self.default_locale());
        let old_locale = self.current_locale;
        if new_locale == old_locale {
            tracing::debug!("Locale already set to {new_locale}");
            return Ok(());
        }

        self.load(old_locale, new_locale)?;
        tracing::info!(%old_locale, %new_locale, "Locale changed");
        Ok(())
    }

    /// Re-reads the tables of the current locale and notifies subscribers with
    /// `old_locale → current locale`.
    ///
    /// One notification is sent per table read: one for the default table,
    /// a second one for the active table when the current locale is not the
    /// default one.
    ///
    /// # Errors
    /// - `DirectoryNotFound` if the localization directory is missing
    /// - `TranslationFileNotFound` if a mandatory file is missing
    /// - `MalformedJson` / `NotATable` / `Io` for unreadable files
    pub fn load_translations(&mut self, old_locale: Locale) -> Result<(), LingualizerError> {
        self.load(old_locale, self.current_locale)
    }

    /// Reads the tables for `new_locale`, installs them, then notifies.
    fn load(&mut self, old_locale: Locale, new_locale: Locale) -> Result<(), LingualizerError> {
        let files = TranslationFiles::from_config(&self.config)?;
        tracing::debug!(dir = %files.dir().display(), %new_locale, "Loading translations");

        let tables = load_tables(&files, self.default_locale(), new_locale)?;
        let notifications = tables.loaded_count();
        let LoadedTables { default_table, active_table } = tables;

        self.current_locale = new_locale;
        self.default_table = default_table;
        self.active_table = active_table;

        let event = LocaleChanged { old_locale, new_locale };
        let failures: usize =
            (0..notifications).map(|_| self.notifier.dispatch(self, &event)).sum();
        if failures > 0 {
            tracing::warn!(%old_locale, %new_locale, failures, "Locale change handlers panicked");
        }
        Ok(())
    }

    /// Resolves `key` against the active table, then the default table.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Resolution<'_> {
        if self.default_table.is_none() && self.active_table.is_none() {
            return Resolution::Unloaded;
        }

        let separator = self.config.defaults().key_separator.as_str();
        if !self.is_default_locale()
            && let Some(value) = self.active_table.as_ref().and_then(|t| t.lookup(key, separator))
        {
            return Resolution::Found(value);
        }

        self.default_table
            .as_ref()
            .and_then(|t| t.lookup(key, separator))
            .map_or(Resolution::Missing, Resolution::Found)
    }

    /// Value of `key` for the current locale.
    ///
    /// - `None` if the key is in no loaded table
    /// - the empty string if no table is loaded at all
    ///
    /// Any defined value is returned, including the empty string and
    /// non-string leaves.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationValue> {
        match self.resolve(key) {
            Resolution::Unloaded => Some(&EMPTY_TEXT),
            Resolution::Missing => None,
            Resolution::Found(value) => Some(value),
        }
    }

    /// Like [`TranslationStore::get`], keeping only string values.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TranslationValue::as_str)
    }

    /// Every key resolvable in the current locale, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let separator = self.config.defaults().key_separator.as_str();
        let mut keys = BTreeSet::new();
        for table in [&self.default_table, &self.active_table].into_iter().flatten() {
            keys.extend(table.leaf_keys(separator));
        }
        keys.into_iter().collect()
    }

    /// Registers a handler called after every (re)load with the store and the transition.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&Self, &LocaleChanged) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Merges `config` (or the discovered file configuration when `None`) into
    /// the defaults and reloads the tables.
    ///
    /// A store serving the default locale keeps serving the default locale
    /// when it changes. Nothing is reloaded when the merged defaults equal the
    /// current ones. On error the previous defaults and tables are kept.
    ///
    /// # Errors
    /// - `Config` for invalid settings
    /// - Any load error
    pub fn update_defaults(
        &mut self,
        config: Option<&LingualizerConfig>,
    ) -> Result<(), LingualizerError> {
        let previous = self.config.clone();
        let followed_default = self.is_default_locale();
        self.config.update_defaults(config)?;
        if self.config.defaults() == previous.defaults() {
            tracing::debug!("Defaults unchanged, skipping reload");
            return Ok(());
        }

        let old_locale = self.current_locale;
        let new_locale = if followed_default { self.default_locale() } else { old_locale };
        if let Err(e) = self.load(old_locale, new_locale) {
            self.config = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Writes a one-line summary of the defaults to `out`.
    ///
    /// # Errors
    /// - Write errors from `out`
    pub fn print_defaults(&self, out: &mut impl io::Write) -> io::Result<()> {
        let summary = self.config.summary();
        tracing::debug!("{summary}");
        writeln!(out, "{summary}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::LocalizationFixture;

    #[googletest::test]
    fn new_serves_default_locale() {
        let fixture = LocalizationFixture::new().with_default(json!({"a": {"b": "hello"}}));

        let store = fixture.store();

        expect_that!(store.locale(), eq(Locale::EnUs));
        expect_that!(store.is_default_locale(), eq(true));
        expect_that!(store.get_text("a.b"), some(eq("hello")));
        expect_that!(store.active_table().is_none(), eq(true));
    }

    #[googletest::test]
    fn override_and_fallback() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({"a": {"b": "hello"}, "only": "default"}))
            .with_locale(Locale::EsMx, json!({"a": {"b": "hola"}}));
        let mut store = fixture.store();

        store.set_locale(Locale::EsMx).unwrap();

        expect_that!(store.get_text("a.b"), some(eq("hola")));
        expect_that!(store.get_text("only"), some(eq("default")));
        expect_that!(store.get("missing"), none());

        store.set_locale(None).unwrap();

        expect_that!(store.locale(), eq(Locale::EnUs));
        expect_that!(store.get_text("a.b"), some(eq("hello")));
    }

    #[googletest::test]
    fn empty_string_in_active_table_wins() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({"title": "Title"}))
            .with_locale(Locale::FrFr, json!({"title": ""}));
        let mut store = fixture.store();

        store.set_locale(Locale::FrFr).unwrap();

        expect_that!(store.get_text("title"), some(eq("")));
    }

    #[googletest::test]
    fn deferred_store_returns_empty_string() {
        let fixture = LocalizationFixture::new().with_default(json!({"a": "b"}));

        let store = TranslationStore::deferred(fixture.config());

        expect_that!(store.resolve("a"), eq(Resolution::Unloaded));
        expect_that!(store.get_text("a"), some(eq("")));
        expect_that!(store.get_text("anything"), some(eq("")));
    }

    #[googletest::test]
    fn same_locale_is_a_no_op() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({"a": "b"}))
            .with_locale(Locale::DeDe, json!({"a": "c"}));
        let mut store = fixture.store();
        store.set_locale(Locale::DeDe).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Removing the file proves nothing is re-read.
        fixture.remove_locale(Locale::DeDe);
        store.set_locale(Locale::DeDe).unwrap();

        expect_that!(calls.load(Ordering::SeqCst), eq(0));
        expect_that!(store.get_text("a"), some(eq("c")));
    }

    #[googletest::test]
    fn missing_locale_file_keeps_previous_state() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({"a": "b"}))
            .with_locale(Locale::EsMx, json!({"a": "c"}));
        let mut store = fixture.store();
        store.set_locale(Locale::EsMx).unwrap();

        let result = store.set_locale(Locale::RuRu);

        match result {
            Err(LingualizerError::TranslationFileNotFound { locale, .. }) => {
                expect_that!(locale, eq(Locale::RuRu));
            }
            other => panic!("Expected TranslationFileNotFound, got {other:?}"),
        }
        expect_that!(store.locale(), eq(Locale::EsMx));
        expect_that!(store.get_text("a"), some(eq("c")));
    }

    #[rstest]
    fn missing_directory_is_fatal() {
        let fixture = LocalizationFixture::new();
        fixture.remove_dir();

        let result = TranslationStore::new(fixture.config());

        assert!(matches!(result, Err(LingualizerError::DirectoryNotFound { .. })));
    }

    #[rstest]
    fn missing_default_file_is_fatal_for_default_locale() {
        let fixture = LocalizationFixture::new();

        let result = TranslationStore::new(fixture.config());

        assert!(matches!(result, Err(LingualizerError::TranslationFileNotFound { .. })));
    }

    #[googletest::test]
    fn notifies_once_per_loaded_table() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({"a": "b"}))
            .with_locale(Locale::ItIt, json!({"a": "c"}));
        let mut store = fixture.store();
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        store.subscribe(move |store, event| {
            sink.lock().unwrap().push((*event, store.get_text("a").map(str::to_string)));
        });

        store.set_locale(Locale::ItIt).unwrap();
        store.set_locale(None).unwrap();

        let to_it = LocaleChanged { old_locale: Locale::EnUs, new_locale: Locale::ItIt };
        let to_en = LocaleChanged { old_locale: Locale::ItIt, new_locale: Locale::EnUs };
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                (to_it, Some("c".to_string())),
                (to_it, Some("c".to_string())),
                (to_en, Some("b".to_string())),
            ]
        );
    }

    #[googletest::test]
    fn panicking_handler_does_not_block_others() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({}))
            .with_locale(Locale::JaJp, json!({}));
        let mut store = fixture.store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(|_, _| panic!("faulty subscriber"));
        store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result = store.set_locale(Locale::JaJp);

        expect_that!(result.is_ok(), eq(true));
        expect_that!(store.locale(), eq(Locale::JaJp));
        expect_that!(calls.load(Ordering::SeqCst), eq(2));
    }

    #[googletest::test]
    fn handlers_run_in_registration_order() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({}))
            .with_locale(Locale::EsMx, json!({}));
        let mut store = fixture.store();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        for index in 0..3 {
            let sink = Arc::clone(&order);
            store.subscribe(move |_, _| sink.lock().unwrap().push(index));
        }

        store.set_locale(Locale::EsMx).unwrap();

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[googletest::test]
    fn unsubscribed_handler_is_not_called() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({}))
            .with_locale(Locale::KoKr, json!({}));
        let mut store = fixture.store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        expect_that!(store.unsubscribe(id), eq(true));
        store.set_locale(Locale::KoKr).unwrap();

        expect_that!(calls.load(Ordering::SeqCst), eq(0));
    }

    #[googletest::test]
    fn deferred_store_notifies_initial_load() {
        let fixture = LocalizationFixture::new().with_default(json!({"a": "b"}));
        let mut store = TranslationStore::deferred(fixture.config());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_, event| {
            assert_eq!(event.old_locale, event.new_locale);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.load_translations(store.locale()).unwrap();

        expect_that!(calls.load(Ordering::SeqCst), eq(1));
        expect_that!(store.get_text("a"), some(eq("b")));
    }

    #[googletest::test]
    fn keys_merges_both_tables() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({"a": "1", "b": {"c": "2"}}))
            .with_locale(Locale::NlNl, json!({"a": "een", "d": "vier"}));
        let mut store = fixture.store();
        store.set_locale(Locale::NlNl).unwrap();

        expect_that!(store.keys(), elements_are![eq("a"), eq("b.c"), eq("d")]);
    }

    #[googletest::test]
    fn update_defaults_follows_new_default_locale() {
        let fixture = LocalizationFixture::new()
            .with_default(json!({"greeting": "hello"}))
            .with_locale(Locale::EsMx, json!({"greeting": "hola"}));
        let mut store = fixture.store();
        let config = LingualizerConfig {
            default_locale: Some("es-MX".to_string()),
            translation_file_name: Some("app.es-MX".to_string()),
            ..LingualizerConfig::default()
        };

        store.update_defaults(Some(&config)).unwrap();

        expect_that!(store.locale(), eq(Locale::EsMx));
        expect_that!(store.is_default_locale(), eq(true));
        expect_that!(store.get_text("greeting"), some(eq("hola")));
    }

    #[rstest]
    #[case::no_config(None)]
    #[case::same_values(Some(LingualizerConfig {
        default_locale: Some("en-US".to_string()),
        translation_file_ext: Some("json".to_string()),
        ..LingualizerConfig::default()
    }))]
    fn update_defaults_without_changes_skips_reload(#[case] config: Option<LingualizerConfig>) {
        let fixture = LocalizationFixture::new().with_default(json!({"a": "b"}));
        let mut store = fixture.store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        // A reload would fail now that the directory is gone.
        fixture.remove_dir();

        store.update_defaults(config.as_ref()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.get_text("a"), Some("b"));
    }

    #[googletest::test]
    fn update_defaults_failure_restores_previous_defaults() {
        let fixture = LocalizationFixture::new().with_default(json!({"a": "b"}));
        let mut store = fixture.store();
        let config = LingualizerConfig {
            localization_dir_name: Some("nowhere".to_string()),
            ..LingualizerConfig::default()
        };

        let result = store.update_defaults(Some(&config));

        expect_that!(
            matches!(result, Err(LingualizerError::DirectoryNotFound { .. })),
            eq(true)
        );
        expect_that!(store.config().defaults().localization_dir_name, eq("localization"));
        expect_that!(store.get_text("a"), some(eq("b")));
    }

    #[googletest::test]
    fn custom_key_separator() {
        let fixture = LocalizationFixture::new().with_default(json!({"menu": {"file.open": "Open"}}));
        let mut store = fixture.store();
        let config = LingualizerConfig {
            key_separator: Some("/".to_string()),
            ..LingualizerConfig::default()
        };

        store.update_defaults(Some(&config)).unwrap();

        expect_that!(store.get_text("menu/file.open"), some(eq("Open")));
    }

    #[googletest::test]
    fn print_defaults_writes_summary() {
        let fixture = LocalizationFixture::new().with_default(json!({}));
        let store = fixture.store();
        let mut out = Vec::new();

        store.print_defaults(&mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        expect_that!(printed, starts_with("lingualizer-> Default Settings locale: en-US"));
        expect_that!(printed, contains_substring(format!("file: {}", fixture.project_name())));
        expect_that!(printed, ends_with("ext: 'json'\n"));
    }
}
