use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use defer_model::{LoadedResource, Locator};
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::{
    document::{Document, LoadHooks, ResourceElement},
    error::LoaderError,
};

/// What a simulated load ends with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedOutcome {
    /// Fire the load hook with a payload of `size` bytes.
    Load { size: u64 },
    /// Fire the error hook.
    Error,
    /// Fire the load hook, then the error hook. Models a misbehaving document.
    LoadThenError { size: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Route {
    outcome: SimulatedOutcome,
    latency: Duration,
}

/// In-memory document with scripted outcomes.
///
/// Unrouted locators use the fallback outcome (an error unless configured).
/// Every attached element is kept in `head`, in attach order.
pub struct SimulatedDocument {
    latency: Duration,
    fallback: SimulatedOutcome,
    routes: HashMap<Locator, Route>,
    head: Mutex<Vec<ResourceElement>>,
}

impl SimulatedDocument {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(50),
            fallback: SimulatedOutcome::Error,
            routes: HashMap::new(),
            head: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_fallback(mut self, outcome: SimulatedOutcome) -> Self {
        self.fallback = outcome;
        self
    }

    pub fn route(self, src: impl Into<Locator>, outcome: SimulatedOutcome) -> Self {
        let latency = self.latency;
        self.route_with_latency(src, outcome, latency)
    }

    pub fn route_with_latency(
        mut self,
        src: impl Into<Locator>,
        outcome: SimulatedOutcome,
        latency: Duration,
    ) -> Self {
        self.routes.insert(src.into(), Route { outcome, latency });
        self
    }

    /// Snapshot of every attached element, in attach order.
    pub fn attached(&self) -> Vec<ResourceElement> {
        self.head().clone()
    }

    /// Number of times `src` was attached.
    pub fn attach_count(&self, src: &Locator) -> usize {
        self.head().iter().filter(|e| &e.src == src).count()
    }

    fn head(&self) -> MutexGuard<'_, Vec<ResourceElement>> {
        self.head.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn route_for(&self, src: &Locator) -> Route {
        self.routes.get(src).copied().unwrap_or(Route {
            outcome: self.fallback,
            latency: self.latency,
        })
    }
}

impl Default for SimulatedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for SimulatedDocument {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn attach(&self, element: ResourceElement, hooks: LoadHooks) {
        let route = self.route_for(&element.src);
        self.head().push(element.clone());
        trace!(target: "defer.exec.document", id = %element.id, src = %element.src, "element attached");

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                hooks.error(LoaderError::NoRuntime(e.to_string()));
                return;
            }
        };

        handle.spawn(async move {
            tokio::time::sleep(route.latency).await;
            let src = element.src;
            match route.outcome {
                SimulatedOutcome::Load { size } => {
                    hooks.load(LoadedResource::new(src).with_size(size));
                }
                SimulatedOutcome::Error => {
                    hooks.error(LoaderError::NotFound(src));
                }
                SimulatedOutcome::LoadThenError { size } => {
                    debug!(target: "defer.exec.document", %src, "firing both hooks");
                    let (on_load, on_error) = hooks.into_parts();
                    on_load(LoadedResource::new(src.clone()).with_size(size));
                    on_error(LoaderError::Refused);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn routed_load_fires_load_hook() {
        let doc = SimulatedDocument::new().route("a.js", SimulatedOutcome::Load { size: 12 });
        let (tx, rx) = tokio::sync::oneshot::channel();

        doc.attach(
            ResourceElement::new("a.js".into()),
            LoadHooks::new(
                move |res| {
                    let _ = tx.send(Ok(res));
                },
                |_| unreachable!("error hook must not fire"),
            ),
        );

        let res: Result<LoadedResource, LoaderError> = rx.await.unwrap();
        assert_eq!(res.unwrap(), LoadedResource::new("a.js".into()).with_size(12));
    }

    #[tokio::test(start_paused = true)]
    async fn unrouted_locator_uses_fallback_error() {
        let doc = SimulatedDocument::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        doc.attach(
            ResourceElement::new("missing.js".into()),
            LoadHooks::new(|_| unreachable!("load hook must not fire"), move |e| {
                let _ = tx.send(e);
            }),
        );

        assert_eq!(rx.await.unwrap(), LoaderError::NotFound("missing.js".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn every_attach_is_recorded() {
        let doc = Arc::new(SimulatedDocument::new().with_fallback(SimulatedOutcome::Load { size: 0 }));
        let src = Locator::from("dup.js");

        doc.attach(ResourceElement::new(src.clone()), LoadHooks::new(|_| {}, |_| {}));
        doc.attach(ResourceElement::new(src.clone()), LoadHooks::new(|_| {}, |_| {}));

        let head = doc.attached();
        assert_eq!(doc.attach_count(&src), 2);
        assert_ne!(head[0].id, head[1].id);
    }

    #[test]
    fn attach_outside_runtime_reports_error() {
        let doc = SimulatedDocument::new().route("a.js", SimulatedOutcome::Load { size: 1 });
        let seen = Arc::new(Mutex::new(None));
        let s = Arc::clone(&seen);

        doc.attach(
            ResourceElement::new("a.js".into()),
            LoadHooks::new(|_| {}, move |e| *s.lock().unwrap() = Some(e)),
        );

        assert!(matches!(
            *seen.lock().unwrap(),
            Some(LoaderError::NoRuntime(_))
        ));
    }
}
