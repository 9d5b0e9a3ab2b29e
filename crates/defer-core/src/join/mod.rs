//! Aggregation of deferred results started in parallel.
//!
//! [`all`] and [`both`] are fail-fast: the first rejection rejects the
//! aggregate right away, without waiting for slower branches.
//! [`all_settled`] is collect-all and never rejects.

use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::trace;

use crate::deferred::{Deferred, Outcome, deferred};

struct Collect<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
}

impl<T> Collect<T> {
    fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            remaining: len,
        }
    }

    /// Stores `value` at `idx`; returns all slots once every one is filled.
    fn fill(&mut self, idx: usize, value: T) -> Option<Vec<T>> {
        self.slots[idx] = Some(value);
        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }
        Some(mem::take(&mut self.slots).into_iter().flatten().collect())
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fulfils with every value, in input order, once all items fulfil.
///
/// Rejects with the first rejection observed. An empty input fulfils
/// immediately with an empty vector.
pub fn all<T, I>(items: I) -> Deferred<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Deferred<T>>,
{
    let items: Vec<_> = items.into_iter().collect();
    if items.is_empty() {
        return Deferred::resolved(Vec::new());
    }

    let (resolver, aggregate) = deferred();
    let collect = Arc::new(Mutex::new(Collect::new(items.len())));

    for (idx, item) in items.into_iter().enumerate() {
        let resolver = resolver.clone();
        let collect = Arc::clone(&collect);
        item.on_settle(move |outcome| match outcome {
            Ok(value) => {
                let done = lock(&collect).fill(idx, value.clone());
                if let Some(values) = done {
                    resolver.resolve(values);
                }
            }
            Err(e) => {
                if resolver.reject(e.clone()) {
                    trace!(target: "defer.join", branch = idx, "aggregate failed fast");
                }
            }
        });
    }
    aggregate
}

/// Fulfils with every outcome, in input order, once all items settle.
pub fn all_settled<T, I>(items: I) -> Deferred<Vec<Outcome<T>>>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Deferred<T>>,
{
    let items: Vec<_> = items.into_iter().collect();
    if items.is_empty() {
        return Deferred::resolved(Vec::new());
    }

    let (resolver, aggregate) = deferred();
    let collect = Arc::new(Mutex::new(Collect::new(items.len())));

    for (idx, item) in items.into_iter().enumerate() {
        let resolver = resolver.clone();
        let collect = Arc::clone(&collect);
        item.on_settle(move |outcome| {
            let done = lock(&collect).fill(idx, outcome.clone());
            if let Some(outcomes) = done {
                resolver.resolve(outcomes);
            }
        });
    }
    aggregate
}

/// Fail-fast join of two deferred results with different value types.
pub fn both<A, B>(a: Deferred<A>, b: Deferred<B>) -> Deferred<(A, B)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    let (resolver, aggregate) = deferred();
    let pair = Arc::new(Mutex::new((None::<A>, None::<B>)));

    {
        let resolver = resolver.clone();
        let pair = Arc::clone(&pair);
        a.on_settle(move |outcome| match outcome {
            Ok(value) => {
                let done = {
                    let mut pair = lock(&pair);
                    pair.0 = Some(value.clone());
                    take_pair(&mut pair)
                };
                if let Some(values) = done {
                    resolver.resolve(values);
                }
            }
            Err(e) => {
                resolver.reject(e.clone());
            }
        });
    }

    b.on_settle(move |outcome| match outcome {
        Ok(value) => {
            let done = {
                let mut pair = lock(&pair);
                pair.1 = Some(value.clone());
                take_pair(&mut pair)
            };
            if let Some(values) = done {
                resolver.resolve(values);
            }
        }
        Err(e) => {
            resolver.reject(e.clone());
        }
    });

    aggregate
}

fn take_pair<A, B>(pair: &mut (Option<A>, Option<B>)) -> Option<(A, B)> {
    if pair.0.is_some() && pair.1.is_some() {
        return pair.0.take().zip(pair.1.take());
    }
    None
}
