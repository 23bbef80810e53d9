//! Direction list assembly.
//!
//! A route carries static `direction_names`; the route patterns serving a
//! stop arrive later from a separate fetch. Placeholders are created from
//! the names first, then each fetched pattern is attached to the
//! placeholder whose direction id it carries.

use serde::Serialize;

use crate::api::RoutePattern;
use crate::domain::DirectionId;

/// A direction resolved from a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Direction {
    pub direction_id: DirectionId,
    pub route_pattern_id: String,
    pub route_pattern_name: String,
}

/// One row of the direction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionEntry {
    /// Static direction name from the route, e.g. `Inbound`.
    pub label: String,

    /// Direction id this placeholder stands for.
    pub key: DirectionId,

    /// Set once a route pattern for this direction serves the stop.
    pub direction: Option<Direction>,
}

impl DirectionEntry {
    /// `"<label>: <route pattern name>"` once resolved, else the label.
    pub fn display_label(&self) -> String {
        match &self.direction {
            Some(d) if !d.route_pattern_name.is_empty() => {
                format!("{}: {}", self.label, d.route_pattern_name)
            }
            _ => self.label.clone(),
        }
    }

    /// Whether the stop is served in this direction.
    pub fn is_selectable(&self) -> bool {
        self.direction.is_some()
    }
}

/// Direction list for the selected route and stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionAssemblyResult {
    /// False until the route pattern fetch has resolved.
    pub built: bool,
    pub direction_wrappers: Vec<DirectionEntry>,
}

impl DirectionAssemblyResult {
    pub fn empty() -> Self {
        Self {
            built: false,
            direction_wrappers: Vec::new(),
        }
    }

    /// Entries that resolved to a direction.
    pub fn selectable(&self) -> impl Iterator<Item = &DirectionEntry> {
        self.direction_wrappers.iter().filter(|e| e.is_selectable())
    }
}

impl Default for DirectionAssemblyResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builds direction lists for one route.
#[derive(Debug, Clone, Default)]
pub struct DirectionAssembler {
    placeholders: Vec<DirectionEntry>,
}

impl DirectionAssembler {
    /// Create one placeholder per direction name, keyed by its index.
    pub fn new(direction_names: &[String]) -> Self {
        let placeholders = direction_names
            .iter()
            .enumerate()
            .map(|(i, name)| DirectionEntry {
                label: name.clone(),
                key: DirectionId::from_index(i),
                direction: None,
            })
            .collect();

        Self { placeholders }
    }

    /// The placeholder-only list shown while patterns are loading.
    pub fn pending(&self) -> DirectionAssemblyResult {
        DirectionAssemblyResult {
            built: false,
            direction_wrappers: self.placeholders.clone(),
        }
    }

    /// Attach route patterns by direction id.
    ///
    /// Patterns are visited in response order; the first pattern for a
    /// direction wins. Placeholders with no pattern stay unresolved, and
    /// patterns with no placeholder are dropped.
    pub fn assemble(&self, patterns: &[RoutePattern]) -> DirectionAssemblyResult {
        let mut entries = self.placeholders.clone();

        for pattern in patterns {
            let direction_id = &pattern.attributes.direction_id;
            match entries
                .iter_mut()
                .find(|e| &e.key == direction_id && e.direction.is_none())
            {
                Some(entry) => {
                    entry.direction = Some(Direction {
                        direction_id: direction_id.clone(),
                        route_pattern_id: pattern.id.clone(),
                        route_pattern_name: pattern.attributes.name.clone(),
                    });
                }
                None => {
                    tracing::debug!(
                        route_pattern = %pattern.id,
                        %direction_id,
                        "route pattern has no open placeholder, ignoring"
                    );
                }
            }
        }

        DirectionAssemblyResult {
            built: true,
            direction_wrappers: entries,
        }
    }
}
