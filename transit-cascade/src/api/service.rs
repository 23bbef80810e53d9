//! Resource fetching with error absorption.

use serde::de::DeserializeOwned;

use crate::log::Logger;
use crate::query::{ResourceQuery, build};

use super::client::Fetcher;
use super::error::ApiError;
use super::types::{Document, Resource};

/// Fetches typed resource collections for a [`ResourceQuery`].
///
/// [`get_resource`](Self::get_resource) never fails: errors are traced,
/// reported to the logger as `"<operation> failed: <error>"`, and turned
/// into an empty collection so the session keeps going.
#[derive(Debug, Clone)]
pub struct ApiService<F, L> {
    fetcher: F,
    logger: L,
    base_url: String,
}

impl<F: Fetcher, L: Logger> ApiService<F, L> {
    pub fn new(fetcher: F, logger: L, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            fetcher,
            logger,
            base_url,
        }
    }

    /// Full request URL: `<base>/<resource>/?<encoded query>`.
    pub fn url_for(&self, query: &ResourceQuery) -> String {
        format!(
            "{}/{}/?{}",
            self.base_url,
            query.resource(),
            build(query).encoded()
        )
    }

    /// Fetch and decode, surfacing every failure.
    pub async fn try_get_resource<A: DeserializeOwned>(
        &self,
        query: &ResourceQuery,
    ) -> Result<Vec<Resource<A>>, ApiError> {
        let url = self.url_for(query);
        tracing::debug!(%url, "fetching");

        let body = self.fetcher.get(&url).await?;

        let document: Document<A> =
            serde_json::from_str(&body).map_err(|e| ApiError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        self.logger.add(format!("fetched {}", query.resource()));
        Ok(document.data)
    }

    /// Fetch and decode, replacing any failure with an empty collection.
    pub async fn get_resource<A: DeserializeOwned>(
        &self,
        query: &ResourceQuery,
        operation: &str,
    ) -> Vec<Resource<A>> {
        match self.try_get_resource(query).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(operation, error = %e, "fetch failed, using empty result");
                self.logger.add(format!("{operation} failed: {e}"));
                Vec::new()
            }
        }
    }
}
