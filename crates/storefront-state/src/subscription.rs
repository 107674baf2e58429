//! Composite cancellable handle
//!
//! A [`Subscription`] collects teardown work: spawned sync tasks, nested
//! subscriptions and plain callbacks. [`Subscription::unsubscribe`] runs all
//! of it exactly once.

use std::fmt;
use tokio::task::JoinHandle;

/// One unit of teardown work
pub enum Teardown {
    /// Background task, aborted on teardown
    Task(JoinHandle<()>),
    /// Child subscription, unsubscribed on teardown
    Nested(Subscription),
    /// Arbitrary cleanup
    Callback(Box<dyn FnOnce() + Send>),
}

impl Teardown {
    fn run(self) {
        match self {
            Self::Task(handle) => handle.abort(),
            Self::Nested(mut subscription) => subscription.unsubscribe(),
            Self::Callback(callback) => callback(),
        }
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(handle) => f.debug_tuple("Task").field(&handle.id()).finish(),
            Self::Nested(subscription) => f.debug_tuple("Nested").field(subscription).finish(),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

impl From<JoinHandle<()>> for Teardown {
    fn from(handle: JoinHandle<()>) -> Self {
        Self::Task(handle)
    }
}

impl From<Subscription> for Teardown {
    fn from(subscription: Subscription) -> Self {
        Self::Nested(subscription)
    }
}

/// Cancellable handle over a set of teardowns
///
/// Dropping the handle unsubscribes it.
#[derive(Debug, Default)]
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    closed: bool,
    teardowns: Vec<Teardown>,
}

impl Subscription {
    /// Create empty, open subscription
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscription owning a single background task
    #[inline]
    pub fn from_task(handle: JoinHandle<()>) -> Self {
        let mut subscription = Self::new();
        subscription.add(handle);
        subscription
    }

    /// Attach teardown work
    ///
    /// Work added to an already closed subscription is torn down immediately.
    pub fn add(&mut self, teardown: impl Into<Teardown>) {
        let teardown = teardown.into();
        if self.closed {
            teardown.run();
        } else {
            self.teardowns.push(teardown);
        }
    }

    /// Attach a cleanup callback
    #[inline]
    pub fn add_callback(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.add(Teardown::Callback(Box::new(callback)));
    }

    /// Run every teardown once; later calls do nothing
    pub fn unsubscribe(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let teardowns = std::mem::take(&mut self.teardowns);
        tracing::trace!(count = teardowns.len(), "Unsubscribing");
        for teardown in teardowns {
            teardown.run();
        }
    }

    /// Whether `unsubscribe` already ran
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of pending teardowns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.teardowns.len()
    }

    /// Whether no teardown is pending
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teardowns.is_empty()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
