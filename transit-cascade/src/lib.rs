//! Progressive transit query narrowing.
//!
//! Walks a user from a route, to a stop on it, to a direction served at
//! that stop, to the next predicted departure, against a JSON:API-style
//! transit API such as the MBTA's v3 API.

pub mod api;
pub mod cascade;
pub mod domain;
pub mod log;
pub mod query;
