mod locator;
pub use locator::Locator;

mod resource;
pub use resource::LoadedResource;

mod settlement;
pub use settlement::Settlement;

/// Delay value in milliseconds.
///
/// Used by timed deferred operations and the demo configuration.
pub type DelayMs = u64;
