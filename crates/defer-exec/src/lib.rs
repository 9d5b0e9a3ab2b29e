mod error;
pub use error::LoaderError;

pub mod document;
pub use document::{Document, LoadHooks, ResourceElement, SimulatedDocument, SimulatedOutcome};
#[cfg(feature = "http")]
pub use document::HttpDocument;

pub mod loader;
pub use loader::{load_chain, load_script, load_script_with};

pub mod timer;
pub use timer::{delayed_failure, delayed_value};

pub mod routines;

pub mod prelude {
    pub use crate::document::{Document, SimulatedDocument, SimulatedOutcome};
    pub use crate::error::LoaderError;
    pub use crate::loader::{load_chain, load_script, load_script_with};
    pub use crate::routines::{
        AllConfig, FailureConfig, FailureReport, PairConfig, PairReport, Step, may_fail,
        parallel, parallel_all, parallel_pair, sequential,
    };
    pub use crate::timer::{delayed_failure, delayed_value};
}
