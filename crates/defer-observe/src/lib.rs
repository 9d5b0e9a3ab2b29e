mod logger;
pub use logger::*;

#[cfg(feature = "settlement")]
mod settlement;
#[cfg(feature = "settlement")]
pub use settlement::*;
