pub mod error;
pub use error::OperationError;

mod state;

pub mod deferred;
pub use deferred::{Deferred, Outcome, Resolver, deferred};

pub mod join;
pub use join::{all, all_settled, both};

pub use defer_model::Settlement;
