use serde::{Deserialize, Serialize};

use crate::Locator;

/// Handle to a resource that the document reported as loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedResource {
    /// Locator the resource was attached with.
    pub src: Locator,
    /// Payload size in bytes, when the document knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl LoadedResource {
    pub fn new(src: Locator) -> Self {
        Self { src, size: None }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}
