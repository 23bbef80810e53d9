//! Query string assembly.
//!
//! Terms are always emitted in the order filters, fields, sort, limit.
//! Optional terms carry their own separating ampersands; the assembled
//! string is then normalized so that no `&` run survives and the string
//! neither starts nor ends with one.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::request::ResourceQuery;

/// Characters escaped for transport. Based on the set `encodeURI` escapes:
/// delimiters such as `&`, `=` and `,` survive, but brackets, spaces and
/// `%` are escaped. `#` is escaped too, since the whole string is query and
/// an unescaped `#` would turn every later term into a fragment.
const URI_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A normalized query string.
///
/// `Display` and [`as_str`](Self::as_str) give the readable form
/// (`filter[route]=Red`); [`encoded`](Self::encoded) gives the form sent
/// over the wire (`filter%5Broute%5D=Red`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryString(String);

impl QueryString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use in a URL.
    pub fn encoded(&self) -> String {
        utf8_percent_encode(&self.0, URI_ESCAPE).to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the normalized query string for a request.
///
/// # Examples
///
/// ```
/// use transit_cascade::query::{ResourceQuery, build};
///
/// let query = ResourceQuery::new("predictions").with_limit(1);
/// assert_eq!(build(&query).as_str(), "page[limit]=1");
/// ```
pub fn build(query: &ResourceQuery) -> QueryString {
    let mut raw = query
        .filters()
        .iter()
        .map(|f| format!("filter[{}]={}", f.resource(), f.values()))
        .collect::<Vec<_>>()
        .join("&");

    if let Some(fields) = query.fields() {
        raw.push_str(&format!("&fields[{}]={}&", fields.resource(), fields.values()));
    }

    if let Some(sort) = query.sort() {
        raw.push_str(&format!("&sort={sort}&"));
    }

    if let Some(limit) = query.limit() {
        raw.push_str(&format!("&page[limit]={limit}"));
    }

    QueryString(collapse_ampersands(&raw).trim_matches('&').to_string())
}

/// Replace every run of two or more `&` with a single `&`.
pub fn collapse_ampersands(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_was_amp = false;

    for c in s.chars() {
        let is_amp = c == '&';
        if !(is_amp && previous_was_amp) {
            out.push(c);
        }
        previous_was_amp = is_amp;
    }

    out
}


#[cfg(test)]
mod proptests {
    use super::*;

    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct QueryParts {
        filters: Vec<(String, String)>,
        fields: Option<(String, String)>,
        sort: Option<String>,
        limit: Option<i64>,
    }

    fn arb_parts() -> impl Strategy<Value = QueryParts> {
        let name = "[a-z_]{1,8}";
        let values = "[a-z0-9, ]{0,12}";
        (
            prop::collection::vec((name, values), 0..4),
            prop::option::of((name, values)),
            prop::option::of("-?[a-z_]{1,8}"),
            prop::option::of(-3i64..50),
        )
            .prop_map(|(filters, fields, sort, limit)| QueryParts {
                filters,
                fields,
                sort,
                limit,
            })
    }

    /// Apply the parts in the natural order.
    fn forward(parts: &QueryParts) -> ResourceQuery {
        let mut query = ResourceQuery::new("things");
        for (r, v) in &parts.filters {
            query = query.with_filter(r, v);
        }
        if let Some((r, v)) = &parts.fields {
            query = query.with_fields(r, v);
        }
        if let Some(s) = &parts.sort {
            query = query.with_sort(s);
        }
        if let Some(l) = parts.limit {
            query = query.with_limit(l);
        }
        query
    }

    /// Apply the same parts with limit, sort and fields set before filters.
    fn backward(parts: &QueryParts) -> ResourceQuery {
        let mut query = ResourceQuery::new("things");
        if let Some(l) = parts.limit {
            query = query.with_limit(l);
        }
        if let Some(s) = &parts.sort {
            query = query.with_sort(s);
        }
        if let Some((r, v)) = &parts.fields {
            query = query.with_fields(r, v);
        }
        for (r, v) in &parts.filters {
            query = query.with_filter(r, v);
        }
        query
    }

    proptest! {
        #[test]
        fn never_doubled_or_dangling_ampersands(parts in arb_parts()) {
            let built = build(&forward(&parts));
            let s = built.as_str();

            prop_assert!(!s.contains("&&"));
            prop_assert!(!s.starts_with('&'));
            prop_assert!(!s.ends_with('&'));
        }

        #[test]
        fn collapse_is_idempotent(parts in arb_parts()) {
            let built = build(&forward(&parts));
            prop_assert_eq!(collapse_ampersands(built.as_str()), built.as_str());
        }

        #[test]
        fn builder_call_order_is_irrelevant(parts in arb_parts()) {
            prop_assert_eq!(build(&forward(&parts)), build(&backward(&parts)));
        }

        #[test]
        fn terms_appear_in_fixed_order(parts in arb_parts()) {
            let built = build(&forward(&parts));
            let s = built.as_str();

            let positions: Vec<usize> = ["filter[", "fields[", "sort=", "page[limit]="]
                .iter()
                .filter_map(|marker| s.find(marker))
                .collect();

            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn limit_present_iff_positive(parts in arb_parts()) {
            let built = build(&forward(&parts));
            let expect_limit = parts.limit.is_some_and(|l| l > 0);
            prop_assert_eq!(built.as_str().contains("page[limit]="), expect_limit);
        }
    }
}
