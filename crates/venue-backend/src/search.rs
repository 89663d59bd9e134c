//! Debounced search input

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Delivers only the last search term typed within the delay
///
/// Each [`submit`](Self::submit) cancels the pending timer and starts a new
/// one. Subscribers see a term once it has been left alone for the full delay.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
    sender: Arc<watch::Sender<String>>,
}

impl SearchDebouncer {
    /// Debouncer with an empty current term
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (sender, _) = watch::channel(String::new());
        Self {
            delay,
            pending: Arc::new(Mutex::new(None)),
            sender: Arc::new(sender),
        }
    }

    /// Configured delay
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Receiver that changes whenever a term settles
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }

    /// Last settled term
    #[must_use]
    pub fn current(&self) -> String {
        self.sender.borrow().clone()
    }

    /// Record a keystroke; must be called inside a Tokio runtime
    pub fn submit(&self, term: impl Into<String>) {
        let term = term.into();
        let sender = Arc::clone(&self.sender);
        let delay = self.delay;

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(term = %term, "Search term settled");
            sender.send_if_modified(|current| {
                if *current == term {
                    false
                } else {
                    *current = term;
                    true
                }
            });
        }));
    }

    /// Drop any pending term without delivering it
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }
}
