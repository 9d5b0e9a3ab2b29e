mod routine;
pub use routine::{RoutineKind, UnknownRoutine};
