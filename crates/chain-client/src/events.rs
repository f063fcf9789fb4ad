//! # Event Queue
//!
//! One-shot dispatch of chain system events to registered handlers.
//!
//! The queue subscribes once to the chain's event feed at `init` time.
//! Each incoming batch is checked against the subscription table (event
//! key -> pending matchers); a matching handler is removed from the
//! table before it is invoked, so firing more than once is not possible
//! even in principle (callbacks are `FnOnce`). Non-matching handlers
//! stay registered, and independent registrations never interfere.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::types::ChainEvent;

/// Expected value(s) for one positional event argument.
#[derive(Debug, Clone)]
pub enum ArgMatch {
    /// The argument must equal this value.
    Equals(Value),
    /// The argument must equal one of these values.
    OneOf(Vec<Value>),
}

impl ArgMatch {
    fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Equals(expected) => values_equal(expected, actual),
            Self::OneOf(expected) => expected.iter().any(|v| values_equal(v, actual)),
        }
    }
}

impl From<Value> for ArgMatch {
    fn from(value: Value) -> Self {
        Self::Equals(value)
    }
}

/// Filter on positional event arguments: argument index -> expectation.
/// An empty filter matches every event with the right key.
pub type ArgFilters = HashMap<usize, ArgMatch>;

type Callback = Box<dyn FnOnce(ChainEvent) + Send>;

struct PendingHandler {
    filters: ArgFilters,
    callback: Callback,
}

impl PendingHandler {
    fn matches(&self, event: &ChainEvent) -> bool {
        self.filters.iter().all(|(index, expectation)| {
            event
                .args
                .get(*index)
                .is_some_and(|actual| expectation.matches(actual))
        })
    }
}

/// One-shot registry of chain event handlers.
#[derive(Default)]
pub struct EventQueue {
    handlers: Arc<Mutex<HashMap<String, Vec<PendingHandler>>>>,
    dispatch_task: Option<JoinHandle<()>>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the dispatch task over the chain's event feed. Called once
    /// per queue; a second call replaces the previous subscription.
    pub fn init(&mut self, mut events: broadcast::Receiver<Vec<ChainEvent>>) {
        self.shutdown();

        let handlers = self.handlers.clone();
        self.dispatch_task = Some(tokio::spawn(async move {
            loop {
                let batch = match events.recv().await {
                    Ok(batch) => batch,
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!(lagged = count, "Event subscriber lagged, batches dropped");
                        continue;
                    }
                };
                dispatch_batch(&handlers, batch).await;
            }
        }));
    }

    /// Registers a one-shot handler for `event_key` (`section.method`).
    ///
    /// The callback fires at most once, for the first event matching the
    /// key and all argument filters, and is deregistered by that firing.
    pub async fn register_handler(
        &self,
        event_key: impl Into<String>,
        filters: ArgFilters,
        callback: impl FnOnce(ChainEvent) + Send + 'static,
    ) {
        let event_key = event_key.into();
        debug!(key = %event_key, "Registering event handler");
        self.handlers
            .lock()
            .await
            .entry(event_key)
            .or_default()
            .push(PendingHandler {
                filters,
                callback: Box::new(callback),
            });
    }

    /// Registers a one-shot handler and returns the matched event as a
    /// future. Dropping the receiver abandons the interest; the
    /// registration is then consumed by the next match and discarded.
    pub async fn wait_for(
        &self,
        event_key: impl Into<String>,
        filters: ArgFilters,
    ) -> oneshot::Receiver<ChainEvent> {
        let (tx, rx) = oneshot::channel();
        self.register_handler(event_key, filters, move |event| {
            let _ = tx.send(event);
        })
        .await;
        rx
    }

    /// Number of pending registrations (all keys).
    pub async fn pending_handlers(&self) -> usize {
        self.handlers.lock().await.values().map(Vec::len).sum()
    }

    /// Stops the dispatch task. Pending registrations are kept and
    /// served again after a new `init`.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.dispatch_task.take() {
            task.abort();
        }
    }
}

impl Drop for EventQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn dispatch_batch(
    handlers: &Mutex<HashMap<String, Vec<PendingHandler>>>,
    batch: Vec<ChainEvent>,
) {
    for event in batch {
        let key = event.key();

        // Matching handlers leave the table before they run; callbacks
        // may re-register without deadlocking on the table lock.
        let matched = {
            let mut table = handlers.lock().await;
            let Some(pending) = table.get_mut(&key) else {
                continue;
            };
            let (matched, kept): (Vec<_>, Vec<_>) = std::mem::take(pending)
                .into_iter()
                .partition(|handler| handler.matches(&event));
            if kept.is_empty() {
                table.remove(&key);
            } else {
                *pending = kept;
            }
            matched
        };

        if !matched.is_empty() {
            debug!(key = %key, fired = matched.len(), "Dispatching event");
        }
        for handler in matched {
            (handler.callback)(event.clone());
        }
    }
}

/// Equality over decoded event argument values, tolerant of the i64/u64
/// split in JSON numbers.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}
