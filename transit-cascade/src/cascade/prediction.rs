//! Next predicted departure.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::api::{ApiService, Fetcher, PredictionAttributes, PredictionResource};
use crate::domain::{DirectionId, RouteId, StopId};
use crate::log::Logger;

use super::requests;

/// Shown when a resolved prediction has no departure.
pub const NO_UPCOMING_DEPARTURE: &str = "We could not find an upcoming departure time for the \
     provided specifications within the current calendar day.";

/// Coarse loading state, for front ends that only toggle a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionState {
    NotLoaded,
    Loaded,
}

/// A predicted departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub id: String,
    /// ISO 8601 timestamp as sent by the API.
    pub departure_time: String,
}

impl Prediction {
    pub fn departure(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.departure_time)
    }

    /// `HH:MM` in the stop's local offset, or the raw value if unparseable.
    pub fn display_time(&self) -> String {
        self.departure()
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|_| self.departure_time.clone())
    }
}

/// Result of resolving the next departure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "prediction")]
pub enum PredictionWrapper {
    #[default]
    NotLoaded,
    Loaded(Prediction),
    NoUpcomingDeparture,
}

impl PredictionWrapper {
    /// Wrap the first prediction of a result set.
    pub fn from_results(results: Vec<PredictionResource>) -> Self {
        let Some(first) = results.into_iter().next() else {
            return PredictionWrapper::NoUpcomingDeparture;
        };

        match first.attributes {
            PredictionAttributes {
                departure_time: Some(departure_time),
            } => PredictionWrapper::Loaded(Prediction {
                id: first.id,
                departure_time,
            }),
            PredictionAttributes {
                departure_time: None,
            } => PredictionWrapper::NoUpcomingDeparture,
        }
    }

    pub fn state(&self) -> PredictionState {
        match self {
            PredictionWrapper::NotLoaded => PredictionState::NotLoaded,
            PredictionWrapper::Loaded(_) | PredictionWrapper::NoUpcomingDeparture => {
                PredictionState::Loaded
            }
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            PredictionWrapper::Loaded(p) => Some(p),
            _ => None,
        }
    }

    /// Message to display instead of a time, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            PredictionWrapper::NoUpcomingDeparture => Some(NO_UPCOMING_DEPARTURE),
            _ => None,
        }
    }
}

/// Fetches the next departure for a fully specified selection.
///
/// Holds no selection of its own; callers pass the ids for each call.
pub struct PredictionResolver<'a, F, L> {
    api: &'a ApiService<F, L>,
}

impl<'a, F: Fetcher, L: Logger> PredictionResolver<'a, F, L> {
    pub fn new(api: &'a ApiService<F, L>) -> Self {
        Self { api }
    }

    /// Resolve to `Loaded` or `NoUpcomingDeparture`; never `NotLoaded`.
    pub async fn resolve(
        &self,
        route: &RouteId,
        stop: &StopId,
        direction: &DirectionId,
    ) -> PredictionWrapper {
        let query = requests::next_departure(route, stop, direction);
        let results = self
            .api
            .get_resource::<PredictionAttributes>(&query, "get_next_predicted_departure")
            .await;

        PredictionWrapper::from_results(results)
    }
}
