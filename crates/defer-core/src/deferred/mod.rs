//! Single-settlement deferred results.
//!
//! A [`Resolver`] settles; any number of [`Deferred`] handles observe.
//! The outcome is written once: the first `resolve`/`reject` wins and every
//! later call is ignored.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use defer_model::Settlement;
use tracing::debug;

use crate::{error::OperationError, state::SettleCell};

/// Outcome of a settled deferred result.
pub type Outcome<T> = Result<T, OperationError>;

/// Create a pending deferred result together with its settling side.
pub fn deferred<T>() -> (Resolver<T>, Deferred<T>) {
    let cell = Arc::new(SettleCell::new());
    let resolver = Resolver {
        guard: Arc::new(AbandonGuard {
            cell: Arc::clone(&cell),
        }),
    };
    (resolver, Deferred { cell })
}

/// Settling side of a deferred result.
///
/// Clones share the same cell. When the last clone is dropped while the
/// result is still pending, it is rejected with [`OperationError::abandoned`].
pub struct Resolver<T> {
    guard: Arc<AbandonGuard<T>>,
}

struct AbandonGuard<T> {
    cell: Arc<SettleCell<T>>,
}

impl<T> Drop for AbandonGuard<T> {
    fn drop(&mut self) {
        if self.cell.settle(Err(OperationError::abandoned())) {
            debug!(target: "defer.core", "resolver dropped while pending; rejected");
        }
    }
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            guard: Arc::clone(&self.guard),
        }
    }
}

impl<T> Resolver<T> {
    /// Fulfil with `value`. Returns `false` if already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.guard.cell.settle(Ok(value))
    }

    /// Reject with `error`. Returns `false` if already settled.
    pub fn reject(&self, error: impl Into<OperationError>) -> bool {
        self.guard.cell.settle(Err(error.into()))
    }

    pub fn settle(&self, outcome: Outcome<T>) -> bool {
        self.guard.cell.settle(outcome)
    }

    pub fn is_settled(&self) -> bool {
        self.guard.cell.status().is_terminal()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("state", &self.guard.cell.status())
            .finish()
    }
}

/// Observing side of a deferred result.
///
/// Awaiting yields a clone of the settled outcome, so every handle sees the
/// same value.
pub struct Deferred<T> {
    cell: Arc<SettleCell<T>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("state", &self.cell.status())
            .finish()
    }
}

impl<T> Deferred<T> {
    /// Already fulfilled deferred result.
    pub fn resolved(value: T) -> Self {
        let (resolver, deferred) = deferred();
        resolver.resolve(value);
        deferred
    }

    /// Already rejected deferred result.
    pub fn rejected(error: impl Into<OperationError>) -> Self {
        let (resolver, deferred) = deferred();
        resolver.reject(error);
        deferred
    }

    pub fn state(&self) -> Settlement {
        self.cell.status()
    }

    /// Attach a continuation.
    ///
    /// Fires exactly once after settlement; continuations attached while
    /// pending fire in attachment order, later ones fire immediately.
    pub fn on_settle<F>(&self, f: F)
    where
        F: FnOnce(&Outcome<T>) + Send + 'static,
    {
        self.cell.on_settle(Box::new(f));
    }
}

impl<T> Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Transform the fulfilled value; rejections pass through.
    pub fn map<U, F>(&self, f: F) -> Deferred<U>
    where
        U: Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let (resolver, next) = deferred();
        self.on_settle(move |outcome| {
            resolver.settle(outcome.clone().map(f));
        });
        next
    }

    /// Continue with another deferred operation started from the value.
    ///
    /// The returned result settles with whatever the inner operation settles
    /// with. `f` is not called when `self` rejects.
    pub fn and_then<U, F>(&self, f: F) -> Deferred<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Deferred<U> + Send + 'static,
    {
        let (resolver, next) = deferred();
        self.on_settle(move |outcome| match outcome {
            Ok(value) => {
                f(value.clone()).on_settle(move |inner| {
                    resolver.settle(inner.clone());
                });
            }
            Err(e) => {
                resolver.reject(e.clone());
            }
        });
        next
    }

    /// Turn a rejection into a value.
    pub fn recover<F>(&self, f: F) -> Deferred<T>
    where
        F: FnOnce(&OperationError) -> T + Send + 'static,
    {
        let (resolver, next) = deferred();
        self.on_settle(move |outcome| {
            let value = match outcome {
                Ok(value) => value.clone(),
                Err(e) => f(e),
            };
            resolver.resolve(value);
        });
        next
    }
}

impl<T: Clone> Future for Deferred<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.cell.poll_outcome(cx.waker()) {
            Some(outcome) => Poll::Ready((*outcome).clone()),
            None => Poll::Pending,
        }
    }
}
