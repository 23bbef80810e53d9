//! The route → stop → direction → prediction cascade.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::api::{
    ApiService, Fetcher, Route, RouteAttributes, RoutePatternAttributes, Stop, StopAttributes,
};
use crate::domain::{DirectionId, RouteId, StopId};
use crate::log::Logger;

use super::config::CascadeConfig;
use super::directions::{DirectionAssembler, DirectionAssemblyResult};
use super::prediction::{PredictionResolver, PredictionWrapper};
use super::requests;
use super::selection::{
    CascadeError, CascadeStage, FetchStage, FetchTicket, Generations, SelectionState,
};

/// Everything a front end renders, captured at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeView {
    pub selection: SelectionState,
    pub routes: Vec<Route>,
    pub stops: Vec<Stop>,
    pub directions: DirectionAssemblyResult,
    pub prediction: PredictionWrapper,
}

#[derive(Debug, Default)]
struct CascadeState {
    selection: SelectionState,
    generations: Generations,
    routes: Vec<Route>,
    stops: Vec<Stop>,
    assembler: DirectionAssembler,
    directions: DirectionAssemblyResult,
    prediction: PredictionWrapper,
}

impl CascadeState {
    fn begin_route(&mut self, route: RouteId) -> FetchTicket {
        let direction_names = self
            .routes
            .iter()
            .find(|r| r.id == route.as_str())
            .map(|r| r.attributes.direction_names.as_slice())
            .unwrap_or_default();
        if direction_names.is_empty() {
            tracing::debug!(%route, "no direction names known for route");
        }

        self.assembler = DirectionAssembler::new(direction_names);
        self.stops.clear();
        self.directions = self.assembler.pending();
        self.prediction = PredictionWrapper::NotLoaded;
        self.selection.select_route(route);
        self.generations.advance_from(FetchStage::Stops)
    }

    fn begin_stop(&mut self, stop: StopId) -> Result<(RouteId, FetchTicket), CascadeError> {
        let route = self.selection.select_stop(stop)?;
        self.directions = self.assembler.pending();
        self.prediction = PredictionWrapper::NotLoaded;
        Ok((route, self.generations.advance_from(FetchStage::Directions)))
    }

    fn begin_direction(
        &mut self,
        direction: DirectionId,
    ) -> Result<(RouteId, StopId, FetchTicket), CascadeError> {
        let (route, stop) = self.selection.select_direction(direction)?;
        self.prediction = PredictionWrapper::NotLoaded;
        Ok((
            route,
            stop,
            self.generations.advance_from(FetchStage::Prediction),
        ))
    }

    /// Whether a result for `ticket` may still be applied.
    fn accepts(&self, ticket: FetchTicket) -> bool {
        let current = self.generations.is_current(ticket);
        if !current {
            tracing::debug!(stage = ?ticket.stage(), "discarding stale fetch result");
        }
        current
    }
}

/// Owns the selection and every collection derived from it.
///
/// Each `select_*` call clears the downstream state, records the
/// selection and logs it before returning; the returned future performs
/// the next fetch. Several futures may be in flight at once: a result is
/// applied only if no later selection has superseded it.
pub struct SelectionCascade<F, L> {
    api: ApiService<F, L>,
    logger: L,
    config: CascadeConfig,
    state: Mutex<CascadeState>,
}

impl<F: Fetcher, L: Logger + Clone> SelectionCascade<F, L> {
    pub fn new(fetcher: F, logger: L, base_url: impl Into<String>, config: CascadeConfig) -> Self {
        Self {
            api: ApiService::new(fetcher, logger.clone(), base_url),
            logger,
            config,
            state: Mutex::new(CascadeState::default()),
        }
    }

    /// Fetch the routes offered at the first stage.
    pub async fn load_routes(&self) {
        let ticket = self.lock().generations.issue(FetchStage::Routes);

        let query = requests::routes(&self.config.route_types);
        let routes = self
            .api
            .get_resource::<RouteAttributes>(&query, "get_routes")
            .await;

        let mut state = self.lock();
        if state.accepts(ticket) {
            state.routes = routes;
        }
    }

    /// Select a route and fetch its stops.
    pub fn select_route(&self, route: RouteId) -> impl Future<Output = ()> {
        let ticket = self.lock().begin_route(route.clone());
        self.logger.add(format!("Selected route id = {route}"));

        async move {
            let query = requests::stops(&route);
            let stops = self
                .api
                .get_resource::<StopAttributes>(&query, "get_stops")
                .await;

            let mut state = self.lock();
            if state.accepts(ticket) {
                state.stops = stops;
            }
        }
    }

    /// Select a stop on the current route and fetch its directions.
    pub fn select_stop(&self, stop: StopId) -> Result<impl Future<Output = ()>, CascadeError> {
        let (route, ticket) = self.lock().begin_stop(stop.clone())?;
        self.logger.add(format!("Selected stop id = {stop}"));

        Ok(async move {
            let query = requests::route_patterns(&route, &stop);
            let patterns = self
                .api
                .get_resource::<RoutePatternAttributes>(&query, "get_route_patterns")
                .await;

            let mut state = self.lock();
            if state.accepts(ticket) {
                state.directions = state.assembler.assemble(&patterns);
            }
        })
    }

    /// Select a direction at the current stop and resolve the next departure.
    pub fn select_direction(
        &self,
        direction: DirectionId,
    ) -> Result<impl Future<Output = ()>, CascadeError> {
        let (route, stop, ticket) = self.lock().begin_direction(direction.clone())?;
        self.logger.add(format!("Selected direction id = {direction}"));

        Ok(async move {
            let prediction = PredictionResolver::new(&self.api)
                .resolve(&route, &stop, &direction)
                .await;

            let mut state = self.lock();
            if state.accepts(ticket) {
                state.prediction = prediction;
            }
        })
    }

    pub fn selection(&self) -> SelectionState {
        self.lock().selection.clone()
    }

    pub fn stage(&self) -> CascadeStage {
        self.lock().selection.stage()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.lock().routes.clone()
    }

    pub fn stops(&self) -> Vec<Stop> {
        self.lock().stops.clone()
    }

    pub fn directions(&self) -> DirectionAssemblyResult {
        self.lock().directions.clone()
    }

    pub fn prediction(&self) -> PredictionWrapper {
        self.lock().prediction.clone()
    }

    pub fn snapshot(&self) -> CascadeView {
        let state = self.lock();
        CascadeView {
            selection: state.selection.clone(),
            routes: state.routes.clone(),
            stops: state.stops.clone(),
            directions: state.directions.clone(),
            prediction: state.prediction.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CascadeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
