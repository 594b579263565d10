//! Reactive query driver.
//!
//! Holds the observable state of one operation for a changing input, the
//! way a page keeps a lookup in sync with a text field.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use rns_core::types::QueryState;

use crate::operation::Operation;

struct Shared<T> {
    generation: Mutex<u64>,
    state: watch::Sender<QueryState<T>>,
}

/// Drives an [`Operation`] as its input changes.
///
/// Each input change bumps a generation counter. A result is published only
/// if its generation is still current, and the previous in-flight read is
/// aborted, so a slow response for an old input never overwrites the state
/// of a newer one. Dropping the driver aborts the in-flight read.
pub struct QueryDriver<O: Operation> {
    operation: Arc<O>,
    shared: Arc<Shared<O::Output>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<O: Operation> QueryDriver<O> {
    /// Creates a driver in the disabled state.
    pub fn new(operation: Arc<O>) -> Self {
        let (state, _) = watch::channel(QueryState::disabled());
        Self {
            operation,
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                state,
            }),
            task: Mutex::new(None),
        }
    }

    /// Sets a new input.
    ///
    /// A failed precondition publishes `disabled` and dispatches nothing.
    /// Otherwise `loading` is published and the read runs in the background.
    /// Must be called within a tokio runtime.
    pub fn set_input(&self, input: O::Input) {
        let prepared = self.operation.prepare(&input);

        let mut generation = self.shared.generation.lock();
        *generation += 1;
        let current = *generation;

        if let Some(previous) = self.task.lock().take() {
            previous.abort();
        }

        let Some(prepared) = prepared else {
            debug!(generation = current, "Precondition not met, query disabled");
            self.shared.state.send_replace(QueryState::disabled());
            return;
        };

        self.shared.state.send_replace(QueryState::loading());

        let operation = Arc::clone(&self.operation);
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let result = operation.run(prepared).await;

            let generation = shared.generation.lock();
            if *generation == current {
                shared.state.send_replace(QueryState::from_result(result));
            } else {
                debug!(stale = current, current = *generation, "Discarding stale response");
            }
        });
        *self.task.lock() = Some(handle);
    }

    /// Clears the input: the state becomes disabled.
    pub fn clear(&self) {
        let mut generation = self.shared.generation.lock();
        *generation += 1;
        if let Some(previous) = self.task.lock().take() {
            previous.abort();
        }
        self.shared.state.send_replace(QueryState::disabled());
    }

    /// Watches state transitions.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<O::Output>> {
        self.shared.state.subscribe()
    }

    /// The current state.
    pub fn current(&self) -> QueryState<O::Output> {
        self.shared.state.borrow().clone()
    }

    /// Waits until the latest input has finished loading.
    pub async fn settled(&self) -> QueryState<O::Output> {
        let mut receiver = self.shared.state.subscribe();
        let settled = match receiver.wait_for(|state| state.is_settled()).await {
            Ok(state) => state.clone(),
            Err(_) => self.current(),
        };
        settled
    }
}

impl<O: Operation> Drop for QueryDriver<O> {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}
