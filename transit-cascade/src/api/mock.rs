//! Mock fetcher for testing without network access.
//!
//! Responses are matched by substring against the *decoded* request URL,
//! so patterns read like `stops/?filter[route]=Red`. The first registered
//! pattern that matches wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use percent_encoding::percent_decode_str;
use tokio::sync::Notify;

use super::client::Fetcher;
use super::error::ApiError;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16, String),
}

#[derive(Debug)]
struct Canned {
    pattern: String,
    reply: Reply,
    gate: Option<Arc<Notify>>,
}

#[derive(Debug, Default)]
struct Inner {
    canned: Vec<Canned>,
    requests: Vec<String>,
}

/// Fetcher that serves canned responses.
///
/// Cloning shares the registered responses and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    inner: Arc<Mutex<Inner>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests matching `pattern` with `body`.
    pub fn respond(&self, pattern: &str, body: impl Into<String>) -> &Self {
        self.push(pattern, Reply::Body(body.into()), None);
        self
    }

    /// Answer requests matching `pattern` with an error status.
    pub fn fail(&self, pattern: &str, status: u16, message: &str) -> &Self {
        self.push(pattern, Reply::Status(status, message.to_string()), None);
        self
    }

    /// Answer requests matching `pattern` with `body`, but only once the
    /// returned handle has been notified.
    pub fn respond_held(&self, pattern: &str, body: impl Into<String>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(pattern, Reply::Body(body.into()), Some(gate.clone()));
        gate
    }

    /// Decoded URLs of every request received, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn push(&self, pattern: &str, reply: Reply, gate: Option<Arc<Notify>>) {
        self.lock().canned.push(Canned {
            pattern: pattern.to_string(),
            reply,
            gate,
        });
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Fetcher for MockFetcher {
    async fn get(&self, url: &str) -> Result<String, ApiError> {
        let decoded = percent_decode_str(url).decode_utf8_lossy().into_owned();

        let matched = {
            let mut inner = self.lock();
            inner.requests.push(decoded.clone());
            inner
                .canned
                .iter()
                .find(|c| decoded.contains(&c.pattern))
                .map(|c| (c.reply.clone(), c.gate.clone()))
        };

        let Some((reply, gate)) = matched else {
            return Err(ApiError::Api {
                status: 404,
                message: format!("No mock response for {decoded}"),
            });
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(429, _) => Err(ApiError::RateLimited),
            Reply::Status(status, message) => Err(ApiError::Api { status, message }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matches_decoded_url() {
        let fetcher = MockFetcher::new();
        fetcher.respond("stops/?filter[route]=Red", "{}");

        let body = fetcher
            .get("https://example.test/stops/?filter%5Broute%5D=Red")
            .await
            .unwrap();

        assert_eq!(body, "{}");
        assert_eq!(
            fetcher.requests(),
            ["https://example.test/stops/?filter[route]=Red"]
        );
    }

    #[tokio::test]
    async fn first_pattern_wins() {
        let fetcher = MockFetcher::new();
        fetcher.respond("stops/", "first").respond("stops/", "second");

        assert_eq!(fetcher.get("x/stops/").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn status_429_is_rate_limited() {
        let fetcher = MockFetcher::new();
        fetcher.fail("routes/", 429, "slow down");

        let result = fetcher.get("x/routes/").await;
        assert!(matches!(result, Err(ApiError::RateLimited)));
    }

    #[tokio::test]
    async fn held_response_waits_for_release() {
        let fetcher = MockFetcher::new();
        let gate = fetcher.respond_held("stops/", "late");

        let mut pending = std::pin::pin!(fetcher.get("x/stops/"));
        assert!(futures::poll!(pending.as_mut()).is_pending());

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), "late");
    }
}
