//! API response DTOs.
//!
//! Every resource endpoint answers with a JSON:API document whose `data`
//! array holds `{ id, attributes }` objects. Field restrictions mean most
//! attributes may be missing, so they default rather than fail.

use serde::{Deserialize, Serialize};

use crate::domain::DirectionId;

/// Top-level response body.
///
/// `data` is required: error documents (`{ "errors": [...] }`) fail to
/// decode instead of reading as an empty collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<A> {
    pub data: Vec<Resource<A>>,
}

/// One item of a response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Resource<A> {
    pub id: String,
    pub attributes: A,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RouteAttributes {
    #[serde(default)]
    pub long_name: String,

    /// Direction names indexed by direction id, e.g. `["South", "North"]`.
    /// Null entries become empty strings.
    #[serde(default, deserialize_with = "names_or_empty")]
    pub direction_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StopAttributes {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoutePatternAttributes {
    #[serde(default)]
    pub name: String,

    pub direction_id: DirectionId,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionAttributes {
    /// ISO 8601 timestamp. Null at the last stop of a trip.
    #[serde(default)]
    pub departure_time: Option<String>,
}

pub type Route = Resource<RouteAttributes>;
pub type Stop = Resource<StopAttributes>;
pub type RoutePattern = Resource<RoutePatternAttributes>;
pub type PredictionResource = Resource<PredictionAttributes>;

fn names_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(names
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
