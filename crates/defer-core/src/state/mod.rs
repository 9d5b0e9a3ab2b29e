use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::Waker,
};

use defer_model::Settlement;
use tracing::trace;

use crate::deferred::Outcome;
#[cfg(test)]
use crate::error::OperationError;

pub(crate) type Continuation<T> = Box<dyn FnOnce(&Outcome<T>) + Send + 'static>;

/// Single-assignment cell shared by a resolver and its deferred handles.
pub(crate) struct SettleCell<T> {
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    status: Settlement,
    /// Set exactly once, together with the terminal status.
    outcome: Option<Arc<Outcome<T>>>,
    /// Continuations registered while pending, in attachment order.
    continuations: Vec<Continuation<T>>,
    /// Tasks currently awaiting a handle.
    wakers: Vec<Waker>,
}

impl<T> SettleCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                status: Settlement::Pending,
                outcome: None,
                continuations: Vec::new(),
                wakers: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn status(&self) -> Settlement {
        self.lock().status
    }

    /// Moves the cell into a terminal state.
    ///
    /// Returns `false` (and drops `outcome`) if the cell was already settled.
    /// Continuations run after the lock is released.
    pub(crate) fn settle(&self, outcome: Outcome<T>) -> bool {
        let next = match &outcome {
            Ok(_) => Settlement::Fulfilled,
            Err(_) => Settlement::Rejected,
        };

        let (outcome, continuations, wakers) = {
            let mut inner = self.lock();
            if !inner.status.can_transition_to(next) {
                trace!(
                    target: "defer.core",
                    current = inner.status.as_str(),
                    ignored = next.as_str(),
                    "late settlement ignored"
                );
                return false;
            }
            inner.status = next;

            let outcome = Arc::new(outcome);
            inner.outcome = Some(Arc::clone(&outcome));
            (
                outcome,
                mem::take(&mut inner.continuations),
                mem::take(&mut inner.wakers),
            )
        };

        trace!(
            target: "defer.core",
            state = next.as_str(),
            continuations = continuations.len(),
            "deferred result settled"
        );
        for continuation in continuations {
            continuation(&outcome);
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }

    /// Registers a continuation, or runs it right away if already settled.
    pub(crate) fn on_settle(&self, continuation: Continuation<T>) {
        let outcome = {
            let mut inner = self.lock();
            match inner.outcome.clone() {
                Some(outcome) => outcome,
                None => {
                    inner.continuations.push(continuation);
                    return;
                }
            }
        };
        continuation(&outcome);
    }

    /// Returns the outcome, or parks `waker` until settlement.
    pub(crate) fn poll_outcome(&self, waker: &Waker) -> Option<Arc<Outcome<T>>> {
        let mut inner = self.lock();
        if let Some(outcome) = &inner.outcome {
            return Some(Arc::clone(outcome));
        }
        if !inner.wakers.iter().any(|w| w.will_wake(waker)) {
            inner.wakers.push(waker.clone());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        task::Wake,
    };

    #[test]
    fn first_settlement_wins() {
        let cell = SettleCell::<u32>::new();
        assert_eq!(cell.status(), Settlement::Pending);

        assert!(cell.settle(Ok(1)));
        assert!(!cell.settle(Ok(2)));
        assert!(!cell.settle(Err(OperationError::new("late"))));

        assert_eq!(cell.status(), Settlement::Fulfilled);
        let outcome = cell.poll_outcome(Waker::noop()).unwrap();
        assert_eq!(*outcome, Ok(1));
    }

    #[test]
    fn continuations_fire_once_in_attachment_order() {
        let cell = SettleCell::<&'static str>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = Arc::clone(&order);
            cell.on_settle(Box::new(move |_: &Outcome<&'static str>| {
                order.lock().unwrap().push(n)
            }));
        }
        cell.settle(Err(OperationError::new("boom")));
        cell.settle(Ok("ignored"));

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn late_continuation_runs_immediately() {
        let cell = SettleCell::<u8>::new();
        cell.settle(Ok(7));

        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        cell.on_settle(Box::new(move |outcome: &Outcome<u8>| {
            assert_eq!(*outcome, Ok(7));
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn pending_poll_registers_waker_once() {
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(Arc::clone(&counter));

        let cell = SettleCell::<u8>::new();
        assert!(cell.poll_outcome(&waker).is_none());
        assert!(cell.poll_outcome(&waker.clone()).is_none());
        assert_eq!(cell.lock().wakers.len(), 1);

        cell.settle(Ok(3));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert!(cell.lock().wakers.is_empty());
    }
}
