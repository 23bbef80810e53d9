//! Cascade configuration.

/// Default route types: light rail (0) and heavy rail (1).
const DEFAULT_ROUTE_TYPES: &str = "0,1";

/// Configuration parameters for the selection cascade.
#[derive(Debug, Clone)]
pub struct CascadeConfig {
    /// Comma-separated route types offered at the first stage.
    pub route_types: String,
}

impl CascadeConfig {
    pub fn new() -> Self {
        Self {
            route_types: DEFAULT_ROUTE_TYPES.to_string(),
        }
    }

    /// Offer different route types, e.g. `"3"` for buses.
    pub fn with_route_types(mut self, route_types: impl Into<String>) -> Self {
        self.route_types = route_types.into();
        self
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(CascadeConfig::default().route_types, "0,1");
    }

    #[test]
    fn custom_route_types() {
        let config = CascadeConfig::new().with_route_types("2,3");
        assert_eq!(config.route_types, "2,3");
    }
}
