//! Thread-safe handle to a [`TranslationStore`].

use std::fmt;
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use super::{
    LocaleChanged,
    SubscriptionId,
    TranslationStore,
};
use crate::error::LingualizerError;
use crate::locale::Locale;
use crate::translation::TranslationValue;

/// Cloneable handle sharing one store between threads.
///
/// Every operation takes the same lock, so a locale switch (reload and
/// notification included) is never observed half-done by `get`.
///
/// Handlers run while the lock is held. They receive the store directly and
/// must not call back into this handle.
#[derive(Clone)]
pub struct SharedTranslationStore {
    /// The shared store
    inner: Arc<Mutex<TranslationStore>>,
}

impl SharedTranslationStore {
    #[must_use]
    pub fn new(store: TranslationStore) -> Self {
        Self { inner: Arc::new(Mutex::new(store)) }
    }

    /// Locks the store. Handler panics are caught inside the store, so a
    /// poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, TranslationStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut TranslationStore) -> R) -> R {
        f(&mut self.lock())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<TranslationValue> {
        self.lock().get(key).cloned()
    }

    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.lock().get_text(key).map(str::to_string)
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.lock().locale()
    }

    /// See [`TranslationStore::set_locale`].
    ///
    /// # Errors
    /// - Any load error; the store keeps its previous locale and tables
    pub fn set_locale(&self, locale: impl Into<Option<Locale>>) -> Result<(), LingualizerError> {
        self.lock().set_locale(locale)
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&TranslationStore, &LocaleChanged) + Send + Sync + 'static,
    {
        self.lock().subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().unsubscribe(id)
    }
}

impl fmt::Debug for SharedTranslationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTranslationStore")
            .field("strong_count", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };
    use std::thread;

    use googletest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::test_utils::LocalizationFixture;

    fn fixture() -> LocalizationFixture {
        LocalizationFixture::new()
            .with_default(json!({"a": {"b": "hello"}}))
            .with_locale(Locale::EsMx, json!({"a": {"b": "hola"}}))
    }

    #[googletest::test]
    fn clone_shares_state() {
        let fixture = fixture();
        let shared1 = SharedTranslationStore::new(fixture.store());
        let shared2 = shared1.clone();

        shared1.set_locale(Locale::EsMx).unwrap();

        expect_that!(shared2.locale(), eq(Locale::EsMx));
        expect_that!(shared2.get_text("a.b"), some(eq("hola")));
        expect_that!(Arc::ptr_eq(&shared1.inner, &shared2.inner), eq(true));
    }

    #[googletest::test]
    fn concurrent_readers_see_a_consistent_table() {
        let fixture = fixture();
        let shared = SharedTranslationStore::new(fixture.store());

        thread::scope(|scope| {
            let writer = shared.clone();
            scope.spawn(move || {
                for i in 0..50 {
                    let locale = if i % 2 == 0 { Locale::EsMx } else { Locale::EnUs };
                    writer.set_locale(locale).unwrap();
                }
            });
            for _ in 0..4 {
                let reader = shared.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        let (locale, text) = reader.with(|store| {
                            (store.locale(), store.get_text("a.b").map(str::to_string))
                        });
                        let expected = if locale == Locale::EsMx { "hola" } else { "hello" };
                        assert_eq!(text.as_deref(), Some(expected));
                    }
                });
            }
        });

        expect_that!(shared.locale(), eq(Locale::EnUs));
    }

    #[googletest::test]
    fn subscribe_through_handle() {
        let fixture = fixture();
        let shared = SharedTranslationStore::new(fixture.store());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = shared.subscribe(move |_, event| {
            if event.new_locale == Locale::EsMx {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        shared.set_locale(Locale::EsMx).unwrap();
        expect_that!(shared.unsubscribe(id), eq(true));
        shared.set_locale(None).unwrap();

        expect_that!(calls.load(Ordering::SeqCst), eq(2));
        expect_that!(
            shared.get("a.b").as_ref(),
            some(eq(&TranslationValue::Text("hello".to_string())))
        );
    }
}
