//! The query issued at each stage of the cascade.

use crate::domain::{DirectionId, RouteId, StopId};
use crate::query::ResourceQuery;

/// Routes of the given types (comma separated), by long name.
pub fn routes(route_types: &str) -> ResourceQuery {
    ResourceQuery::new("routes")
        .with_filter("type", route_types)
        .with_fields("route", "long_name, direction_names")
        .with_sort("long_name")
}

/// Stops served by a route, by name.
pub fn stops(route: &RouteId) -> ResourceQuery {
    ResourceQuery::new("stops")
        .with_filter("route", route.as_str())
        .with_fields("stop", "name, address")
        .with_sort("name")
}

/// Route patterns serving a stop on a route, by direction.
pub fn route_patterns(route: &RouteId, stop: &StopId) -> ResourceQuery {
    ResourceQuery::new("route_patterns")
        .with_filter("route", route.as_str())
        .with_filter("stop", stop.as_str())
        .with_sort("direction_id")
}

/// The soonest prediction, relying on the API's default ordering.
pub fn next_departure(route: &RouteId, stop: &StopId, direction: &DirectionId) -> ResourceQuery {
    ResourceQuery::new("predictions")
        .with_filter("route", route.as_str())
        .with_filter("stop", stop.as_str())
        .with_filter("direction_id", direction.as_str())
        .with_fields("prediction", "departure_time")
        .with_limit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::build;

    #[test]
    fn stage_queries() {
        let red = RouteId::new("Red");
        let park = StopId::new("place-pktrm");

        assert_eq!(
            build(&routes("0,1")).as_str(),
            "filter[type]=0,1&fields[route]=long_name,direction_names&sort=long_name"
        );
        assert_eq!(
            build(&stops(&red)).as_str(),
            "filter[route]=Red&fields[stop]=name,address&sort=name"
        );
        assert_eq!(
            build(&route_patterns(&red, &park)).as_str(),
            "filter[route]=Red&filter[stop]=place-pktrm&sort=direction_id"
        );
        assert_eq!(next_departure(&red, &park, &DirectionId::from_index(0)).sort(), None);
    }
}
