//! Resource query description and query string building.
//!
//! A [`ResourceQuery`] describes one request (filters, fields, sort, limit);
//! [`build`] turns it into a normalized [`QueryString`].

mod builder;
mod request;

pub use builder::{QueryString, build, collapse_ampersands};
pub use request::{FieldSpec, Filter, ResourceQuery};
