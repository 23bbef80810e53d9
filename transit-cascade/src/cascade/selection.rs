//! Selection state and fetch generation tokens.

use serde::Serialize;

use crate::domain::{DirectionId, RouteId, StopId};

/// Error from selecting out of cascade order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CascadeError {
    /// A stop was selected with no route selected
    #[error("cannot select a stop before a route")]
    NoRouteSelected,

    /// A direction was selected with no stop selected
    #[error("cannot select a direction before a stop")]
    NoStopSelected,
}

/// How far the user has narrowed the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CascadeStage {
    NoRoute,
    RouteSelected,
    StopSelected,
    DirectionSelected,
}

/// The user's current route, stop and direction.
///
/// Invariant: a stop implies a route, a direction implies a stop. Every
/// setter clears all later positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    route: Option<RouteId>,
    stop: Option<StopId>,
    direction: Option<DirectionId>,
}

impl SelectionState {
    pub fn route(&self) -> Option<&RouteId> {
        self.route.as_ref()
    }

    pub fn stop(&self) -> Option<&StopId> {
        self.stop.as_ref()
    }

    pub fn direction(&self) -> Option<&DirectionId> {
        self.direction.as_ref()
    }

    pub fn stage(&self) -> CascadeStage {
        match (&self.route, &self.stop, &self.direction) {
            (None, _, _) => CascadeStage::NoRoute,
            (Some(_), None, _) => CascadeStage::RouteSelected,
            (Some(_), Some(_), None) => CascadeStage::StopSelected,
            (Some(_), Some(_), Some(_)) => CascadeStage::DirectionSelected,
        }
    }

    pub fn select_route(&mut self, route: RouteId) {
        self.route = Some(route);
        self.stop = None;
        self.direction = None;
    }

    /// Returns the selected route the stop belongs to.
    pub fn select_stop(&mut self, stop: StopId) -> Result<RouteId, CascadeError> {
        let route = self.route.clone().ok_or(CascadeError::NoRouteSelected)?;
        self.stop = Some(stop);
        self.direction = None;
        Ok(route)
    }

    /// Returns the selected route and stop the direction belongs to.
    pub fn select_direction(
        &mut self,
        direction: DirectionId,
    ) -> Result<(RouteId, StopId), CascadeError> {
        let (Some(route), Some(stop)) = (&self.route, &self.stop) else {
            return Err(CascadeError::NoStopSelected);
        };
        let selected = (route.clone(), stop.clone());
        self.direction = Some(direction);
        Ok(selected)
    }
}

/// The collections the cascade fetches, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FetchStage {
    Routes,
    Stops,
    Directions,
    Prediction,
}

impl FetchStage {
    const ALL: [FetchStage; 4] = [
        FetchStage::Routes,
        FetchStage::Stops,
        FetchStage::Directions,
        FetchStage::Prediction,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Proof that a fetch was issued for a particular generation of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    stage: FetchStage,
    generation: u64,
}

impl FetchTicket {
    pub fn stage(&self) -> FetchStage {
        self.stage
    }
}

/// One monotonically increasing counter per [`FetchStage`].
///
/// A result may be applied only while its ticket is current.
#[derive(Debug, Clone, Default)]
pub struct Generations([u64; 4]);

impl Generations {
    /// Start a new fetch for `stage` alone.
    pub fn issue(&mut self, stage: FetchStage) -> FetchTicket {
        self.0[stage.index()] += 1;
        self.ticket(stage)
    }

    /// Start a new fetch for `stage`, invalidating in-flight fetches of
    /// `stage` and every later stage.
    pub fn advance_from(&mut self, stage: FetchStage) -> FetchTicket {
        for later in FetchStage::ALL.into_iter().filter(|s| *s >= stage) {
            self.0[later.index()] += 1;
        }
        self.ticket(stage)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.0[ticket.stage.index()] == ticket.generation
    }

    fn ticket(&self, stage: FetchStage) -> FetchTicket {
        FetchTicket {
            stage,
            generation: self.0[stage.index()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_follows_selection() {
        let mut selection = SelectionState::default();
        assert_eq!(selection.stage(), CascadeStage::NoRoute);

        selection.select_route(RouteId::new("Red"));
        assert_eq!(selection.stage(), CascadeStage::RouteSelected);

        selection.select_stop(StopId::new("place-pktrm")).unwrap();
        assert_eq!(selection.stage(), CascadeStage::StopSelected);

        selection.select_direction(DirectionId::from_index(0)).unwrap();
        assert_eq!(selection.stage(), CascadeStage::DirectionSelected);
    }

    #[test]
    fn route_clears_stop_and_direction() {
        let mut selection = SelectionState::default();
        selection.select_route(RouteId::new("Red"));
        selection.select_stop(StopId::new("place-pktrm")).unwrap();
        selection.select_direction(DirectionId::from_index(1)).unwrap();

        selection.select_route(RouteId::new("Orange"));

        assert_eq!(selection.route(), Some(&RouteId::new("Orange")));
        assert_eq!(selection.stop(), None);
        assert_eq!(selection.direction(), None);
    }

    #[test]
    fn stop_clears_direction_only() {
        let mut selection = SelectionState::default();
        selection.select_route(RouteId::new("Red"));
        selection.select_stop(StopId::new("place-pktrm")).unwrap();
        selection.select_direction(DirectionId::from_index(1)).unwrap();

        let route = selection.select_stop(StopId::new("place-dwnxg")).unwrap();

        assert_eq!(route, RouteId::new("Red"));
        assert_eq!(selection.stop(), Some(&StopId::new("place-dwnxg")));
        assert_eq!(selection.direction(), None);
    }

    #[test]
    fn out_of_order_selection_rejected() {
        let mut selection = SelectionState::default();

        assert_eq!(
            selection.select_stop(StopId::new("place-pktrm")),
            Err(CascadeError::NoRouteSelected)
        );

        selection.select_route(RouteId::new("Red"));
        assert_eq!(
            selection.select_direction(DirectionId::from_index(0)),
            Err(CascadeError::NoStopSelected)
        );
        assert_eq!(selection.stage(), CascadeStage::RouteSelected);
    }

    #[test]
    fn reissued_stage_invalidates_old_ticket() {
        let mut generations = Generations::default();
        let first = generations.issue(FetchStage::Stops);
        let second = generations.issue(FetchStage::Stops);

        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
    }

    #[test]
    fn advance_invalidates_later_stages_only() {
        let mut generations = Generations::default();
        let routes = generations.issue(FetchStage::Routes);
        let directions = generations.issue(FetchStage::Directions);
        let prediction = generations.issue(FetchStage::Prediction);

        let stops = generations.advance_from(FetchStage::Stops);

        assert!(generations.is_current(routes));
        assert!(generations.is_current(stops));
        assert!(!generations.is_current(directions));
        assert!(!generations.is_current(prediction));
    }
}
