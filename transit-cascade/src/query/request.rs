//! Typed description of one resource request.

use std::num::NonZeroU32;

/// Constraint on a related resource, e.g. stops filtered by `route`.
///
/// Several filters may appear in one query; they combine conjunctively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    resource: String,
    values: String,
}

impl Filter {
    /// Create a filter. Whitespace is stripped from both parts, so
    /// `"0, 1"` becomes `"0,1"`.
    pub fn new(resource: &str, values: &str) -> Self {
        Self {
            resource: strip_whitespace(resource),
            values: strip_whitespace(values),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn values(&self) -> &str {
        &self.values
    }
}

/// Restricts which attributes of one resource type are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    resource: String,
    values: String,
}

impl FieldSpec {
    /// Create a field restriction. Whitespace is stripped from both parts.
    pub fn new(resource: &str, values: &str) -> Self {
        Self {
            resource: strip_whitespace(resource),
            values: strip_whitespace(values),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn values(&self) -> &str {
        &self.values
    }
}

/// Full description of a request against one API resource.
///
/// Built with consuming `with_*` methods. The order of those calls has no
/// effect on the query string produced by [`build`](super::build).
///
/// # Examples
///
/// ```
/// use transit_cascade::query::{ResourceQuery, build};
///
/// let query = ResourceQuery::new("stops")
///     .with_sort("name")
///     .with_filter("route", "Red");
///
/// assert_eq!(build(&query).as_str(), "filter[route]=Red&sort=name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    resource: String,
    filters: Vec<Filter>,
    fields: Option<FieldSpec>,
    sort: Option<String>,
    limit: Option<NonZeroU32>,
}

impl ResourceQuery {
    /// Start a query for the named resource collection (e.g. `routes`).
    pub fn new(resource: &str) -> Self {
        Self {
            resource: strip_whitespace(resource),
            filters: Vec::new(),
            fields: None,
            sort: None,
            limit: None,
        }
    }

    /// Append a filter. Filters keep their call order.
    pub fn with_filter(mut self, resource: &str, values: &str) -> Self {
        self.filters.push(Filter::new(resource, values));
        self
    }

    /// Restrict returned fields. A later call replaces an earlier one.
    pub fn with_fields(mut self, resource: &str, values: &str) -> Self {
        self.fields = Some(FieldSpec::new(resource, values));
        self
    }

    /// Sort by a field, ascending; prefix with `-` for descending.
    /// A field that is empty after stripping whitespace clears the sort.
    pub fn with_sort(mut self, field: &str) -> Self {
        let field = strip_whitespace(field);
        self.sort = (!field.is_empty()).then_some(field);
        self
    }

    /// Cap the number of results. Values `<= 0` clear the limit.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = u32::try_from(limit).ok().and_then(NonZeroU32::new);
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn fields(&self) -> Option<&FieldSpec> {
        self.fields.as_ref()
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn limit(&self) -> Option<NonZeroU32> {
        self.limit
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_stripped() {
        let query = ResourceQuery::new(" routes ")
            .with_filter("type", "0, 1")
            .with_fields("route", "long_name, direction_names")
            .with_sort(" long_name ");

        assert_eq!(query.resource(), "routes");
        assert_eq!(query.filters()[0].values(), "0,1");
        assert_eq!(query.fields().unwrap().values(), "long_name,direction_names");
        assert_eq!(query.sort(), Some("long_name"));
    }

    #[test]
    fn non_positive_limit_is_absent() {
        assert_eq!(ResourceQuery::new("x").with_limit(0).limit(), None);
        assert_eq!(ResourceQuery::new("x").with_limit(-3).limit(), None);
        assert_eq!(
            ResourceQuery::new("x").with_limit(1).limit(),
            NonZeroU32::new(1)
        );
    }

    #[test]
    fn later_limit_overrides_earlier() {
        let query = ResourceQuery::new("x").with_limit(5).with_limit(0);
        assert_eq!(query.limit(), None);
    }

    #[test]
    fn blank_sort_is_absent() {
        assert_eq!(ResourceQuery::new("x").with_sort("   ").sort(), None);
    }

    #[test]
    fn filters_keep_call_order() {
        let query = ResourceQuery::new("route_patterns")
            .with_filter("stop", "place-pktrm")
            .with_filter("route", "Red")
            .with_filter("stop", "place-dwnxg");

        let resources: Vec<_> = query.filters().iter().map(Filter::resource).collect();
        assert_eq!(resources, ["stop", "route", "stop"]);
    }
}
