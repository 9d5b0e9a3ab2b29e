//! The document a script is attached to.
//!
//! A [`Document`] is the external, callback-driven side of resource loading:
//! it accepts an element and later fires one of two hooks. Nothing here
//! guarantees that only one hook fires; callers that need single settlement
//! must enforce it themselves (see [`crate::loader`]).

use std::fmt;

use defer_model::{LoadedResource, Locator};
use uuid::Uuid;

use crate::error::LoaderError;

mod simulated;
pub use simulated::{SimulatedDocument, SimulatedOutcome};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::HttpDocument;

/// A loadable element, created once per attach call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceElement {
    pub id: Uuid,
    pub src: Locator,
}

impl ResourceElement {
    pub fn new(src: Locator) -> Self {
        Self {
            id: Uuid::new_v4(),
            src,
        }
    }
}

pub type OnLoad = Box<dyn FnOnce(LoadedResource) + Send + 'static>;
pub type OnError = Box<dyn FnOnce(LoaderError) + Send + 'static>;

/// The `onload` / `onerror` listener pair registered with an element.
pub struct LoadHooks {
    on_load: OnLoad,
    on_error: OnError,
}

impl LoadHooks {
    pub fn new<L, E>(on_load: L, on_error: E) -> Self
    where
        L: FnOnce(LoadedResource) + Send + 'static,
        E: FnOnce(LoaderError) + Send + 'static,
    {
        Self {
            on_load: Box::new(on_load),
            on_error: Box::new(on_error),
        }
    }

    /// Fire the load listener.
    pub fn load(self, resource: LoadedResource) {
        (self.on_load)(resource)
    }

    /// Fire the error listener.
    pub fn error(self, reason: LoaderError) {
        (self.on_error)(reason)
    }

    /// Split into independent listeners, for documents that may fire both.
    pub fn into_parts(self) -> (OnLoad, OnError) {
        (self.on_load, self.on_error)
    }
}

impl fmt::Debug for LoadHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoadHooks")
    }
}

/// External environment that loads resources.
pub trait Document: Send + Sync {
    fn name(&self) -> &'static str;

    /// Append `element` and report its fate through `hooks`, asynchronously.
    ///
    /// Each call must start a new load; documents don't deduplicate.
    fn attach(&self, element: ResourceElement, hooks: LoadHooks);
}
