//! Client for a JSON:API-style transit resource API.
//!
//! Requests have the shape `GET <base>/<resource>/?<query>` and answer
//! with `{ "data": [ { "id", "attributes" }, ... ] }`.
//!
//! - [`Fetcher`] performs the GET ([`HttpFetcher`] in production,
//!   [`MockFetcher`] in tests)
//! - [`ApiService`] builds URLs, decodes bodies, and absorbs failures

mod client;
mod error;
pub mod mock;
mod service;
mod types;

pub use client::{ApiConfig, Fetcher, HttpFetcher};
pub use error::ApiError;
pub use mock::MockFetcher;
pub use service::ApiService;
pub use types::{
    Document, PredictionAttributes, PredictionResource, Resource, Route, RouteAttributes,
    RoutePattern, RoutePatternAttributes, Stop, StopAttributes,
};
