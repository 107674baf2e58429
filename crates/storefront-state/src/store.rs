//! Reactive state container
//!
//! [`Store`] owns one state value. Every [`Store::update`] notifies all
//! observers; each observer sees values in update order (intermediate values
//! may be coalesced for a slow observer, the latest one is never lost).

use futures::stream::{BoxStream, StreamExt};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Shared handle to a single state value
pub struct Store<S> {
    sender: Arc<watch::Sender<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.sender.borrow())
            .field("observers", &self.sender.receiver_count())
            .finish()
    }
}

impl<S> Store<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create store with initial state
    #[inline]
    #[must_use]
    pub fn new(initial: S) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Snapshot of the current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> S {
        self.sender.borrow().clone()
    }

    /// Read a projection of the current state without cloning all of it
    #[inline]
    pub fn read<T>(&self, projection: impl FnOnce(&S) -> T) -> T {
        projection(&self.sender.borrow())
    }

    /// Apply an update function and notify observers
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.sender.send_modify(f);
    }

    /// Register a raw observer
    ///
    /// The current value is marked as seen; only later updates are reported
    /// by `changed()`.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.sender.subscribe()
    }

    /// Stream of a projected view: current value first, then every change
    pub fn select<T, F>(&self, projection: F) -> BoxStream<'static, T>
    where
        T: Send + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        WatchStream::new(self.sender.subscribe())
            .map(move |state| projection(&state))
            .boxed()
    }

    /// Number of registered observers
    #[inline]
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<S> Default for Store<S>
where
    S: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}
