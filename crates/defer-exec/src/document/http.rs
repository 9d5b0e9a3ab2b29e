use std::sync::{Mutex, PoisonError};

use defer_model::LoadedResource;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::{
    document::{Document, LoadHooks, ResourceElement},
    error::LoaderError,
};

/// Document that "loads" a script by fetching its locator over HTTP.
///
/// A 2xx response fires the load hook with the body size; any other status
/// or transport error fires the error hook.
pub struct HttpDocument {
    client: reqwest::Client,
    head: Mutex<Vec<ResourceElement>>,
}

impl HttpDocument {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            head: Mutex::new(Vec::new()),
        }
    }

    pub fn attached(&self) -> Vec<ResourceElement> {
        self.head
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HttpDocument {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl Document for HttpDocument {
    fn name(&self) -> &'static str {
        "http"
    }

    fn attach(&self, element: ResourceElement, hooks: LoadHooks) {
        self.head
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(element.clone());

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                hooks.error(LoaderError::NoRuntime(e.to_string()));
                return;
            }
        };

        let client = self.client.clone();
        handle.spawn(async move {
            let src = element.src;
            trace!(target: "defer.exec.document", id = %element.id, %src, "fetching");

            let resp = match client.get(src.as_str()).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    hooks.error(LoaderError::Request(e.to_string()));
                    return;
                }
            };

            let status = resp.status();
            if !status.is_success() {
                debug!(target: "defer.exec.document", %src, status = status.as_u16(), "non-success status");
                hooks.error(LoaderError::Status {
                    src,
                    status: status.as_u16(),
                });
                return;
            }

            match resp.bytes().await {
                Ok(body) => hooks.load(LoadedResource::new(src).with_size(body.len() as u64)),
                Err(e) => hooks.error(LoaderError::Request(e.to_string())),
            }
        });
    }
}
