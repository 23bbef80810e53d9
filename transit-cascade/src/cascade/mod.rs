//! Dependent selection cascade.
//!
//! The user narrows a query one stage at a time:
//!
//! route → stop → direction → next predicted departure
//!
//! Selecting at one stage synchronously clears every later stage, then
//! fetches the next one. In-flight fetches are stamped with a per-stage
//! generation so that a result arriving after a newer selection is
//! discarded instead of overwriting fresh state.

mod config;
mod directions;
mod prediction;
mod requests;
mod selection;
mod session;


pub use config::CascadeConfig;
pub use directions::{Direction, DirectionAssembler, DirectionAssemblyResult, DirectionEntry};
pub use prediction::{
    NO_UPCOMING_DEPARTURE, Prediction, PredictionResolver, PredictionState, PredictionWrapper,
};
pub use selection::{
    CascadeError, CascadeStage, FetchStage, FetchTicket, Generations, SelectionState,
};
pub use session::{CascadeView, SelectionCascade};
