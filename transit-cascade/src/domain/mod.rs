//! Domain identifier types.
//!
//! Resource ids are opaque strings from the API; the newtypes keep a stop
//! id from being passed where a route id is expected.

mod ids;

pub use ids::{DirectionId, RouteId, StopId};
