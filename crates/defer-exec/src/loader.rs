//! Script loading on top of a [`Document`].
//!
//! Two flavours of the same operation:
//! - [`load_script_with`]: node-style callback, invoked at most once;
//! - [`load_script`]: returns a [`Deferred`] that settles on the first hook.

use std::sync::{Arc, Mutex, PoisonError};

use defer_core::{Deferred, OperationError, Outcome, deferred};
use defer_model::{LoadedResource, Locator};
use tracing::{debug, info};

use crate::{
    document::{Document, LoadHooks, ResourceElement},
    error::LoaderError,
};

/// Rejection reason for a failed load. Always names the locator.
pub fn load_failed(src: &Locator) -> OperationError {
    OperationError::new(format!("failed to load script {src}"))
}

/// Attach `src` to `document` and report the result through `callback`.
///
/// `callback` runs at most once, even if the document fires both hooks.
pub fn load_script_with<D, F>(document: &D, src: impl Into<Locator>, callback: F)
where
    D: Document + ?Sized,
    F: FnOnce(Outcome<LoadedResource>) + Send + 'static,
{
    let src = src.into();
    let once = Arc::new(Mutex::new(Some(callback)));

    let on_load = {
        let once = Arc::clone(&once);
        move |resource: LoadedResource| {
            if let Some(callback) = take(&once) {
                callback(Ok(resource));
            }
        }
    };
    let on_error = {
        let src = src.clone();
        move |reason: LoaderError| {
            debug!(target: "defer.exec.loader", %src, %reason, "document reported load error");
            if let Some(callback) = take(&once) {
                callback(Err(load_failed(&src)));
            }
        }
    };

    document.attach(ResourceElement::new(src), LoadHooks::new(on_load, on_error));
}

fn take<F>(slot: &Mutex<Option<F>>) -> Option<F> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Attach `src` to `document`; the result settles on whichever hook fires first.
///
/// Every call attaches a new element, repeated locators included.
pub fn load_script<D>(document: &D, src: impl Into<Locator>) -> Deferred<LoadedResource>
where
    D: Document + ?Sized,
{
    let src = src.into();
    let (resolver, loaded) = deferred();

    let on_load = {
        let resolver = resolver.clone();
        move |resource: LoadedResource| {
            resolver.resolve(resource);
        }
    };
    let on_error = {
        let src = src.clone();
        move |reason: LoaderError| {
            debug!(target: "defer.exec.loader", %src, %reason, "document reported load error");
            resolver.reject(load_failed(&src));
        }
    };

    debug!(target: "defer.exec.loader", %src, document = document.name(), "loading script");
    document.attach(ResourceElement::new(src), LoadHooks::new(on_load, on_error));
    loaded
}

/// Load scripts strictly one after another.
///
/// Each load starts only after the previous one fulfilled. The first failure
/// rejects the chain and nothing after it is attached.
pub fn load_chain<D, I>(document: Arc<D>, locators: I) -> Deferred<Vec<LoadedResource>>
where
    D: Document + ?Sized + 'static,
    I: IntoIterator<Item = Locator>,
{
    let mut chain = Deferred::resolved(Vec::new());
    for src in locators {
        let document = Arc::clone(&document);
        chain = chain.and_then(move |mut loaded: Vec<LoadedResource>| {
            load_script(&*document, src).map(move |resource| {
                info!(target: "defer.exec.loader", src = %resource.src, "script loaded");
                loaded.push(resource);
                loaded
            })
        });
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SimulatedDocument, SimulatedOutcome};
    use defer_core::Settlement;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn callback_fires_once_for_double_signal() {
        let doc = SimulatedDocument::new().route("both.js", SimulatedOutcome::LoadThenError { size: 3 });
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = tokio::sync::oneshot::channel();

        let c = Arc::clone(&calls);
        load_script_with(&doc, "both.js", move |outcome| {
            c.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(outcome);
        });

        let outcome = rx.await.unwrap();
        assert_eq!(outcome.unwrap().src, Locator::from("both.js"));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_ignores_late_error_signal() {
        let doc = SimulatedDocument::new().route("both.js", SimulatedOutcome::LoadThenError { size: 3 });
        let loaded = load_script(&doc, "both.js");

        let resource = loaded.clone().await.unwrap();
        assert_eq!(resource.size, Some(3));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(loaded.state(), Settlement::Fulfilled);
    }

    #[test]
    fn load_failed_names_the_locator() {
        let err = load_failed(&Locator::from("x/y.js"));
        assert_eq!(err.message(), "failed to load script x/y.js");
    }
}
