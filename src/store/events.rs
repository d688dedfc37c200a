//! Locale change notifications.

use std::any::Any;
use std::fmt;
use std::panic::{
    self,
    AssertUnwindSafe,
};

use super::TranslationStore;
use crate::locale::Locale;

/// Transition reported to subscribers after tables have been (re)loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocaleChanged {
    pub old_locale: Locale,
    pub new_locale: Locale,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Subscriber callback.
pub type LocaleChangedHandler = Box<dyn Fn(&TranslationStore, &LocaleChanged) + Send + Sync>;

/// Registry of locale change handlers.
///
/// Handlers run synchronously in registration order. Each call is isolated:
/// a panicking handler is logged and skipped, the remaining handlers still run.
#[derive(Default)]
pub struct ChangeNotifier {
    /// Id handed out to the next subscriber
    next_id: u64,
    /// Handlers in registration order
    handlers: Vec<(SubscriptionId, LocaleChangedHandler)>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&TranslationStore, &LocaleChanged) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Calls every handler with `event`. Returns the number of handlers that panicked.
    pub(crate) fn dispatch(&self, store: &TranslationStore, event: &LocaleChanged) -> usize {
        let mut failures = 0;
        for (id, handler) in &self.handlers {
            let result = panic::catch_unwind(AssertUnwindSafe(|| handler(store, event)));
            if let Err(payload) = result {
                failures += 1;
                tracing::error!(
                    subscription = ?id,
                    old_locale = %event.old_locale,
                    new_locale = %event.new_locale,
                    "Locale change handler panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
        failures
    }
}

/// Text of a panic payload (`&str` or `String`).
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("next_id", &self.next_id)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
