//! HTTP client for a running check endpoint.
//!
//! Used by the `query` subcommand: one GET per domain, issued concurrently.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Envelope as returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Outcome of querying one domain.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Domain as given on the command line
    pub domain: String,
    /// Parsed endpoint response, if the call went through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Envelope>,
    /// Transport or decoding failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Client for the `/check` endpoint of one server.
#[derive(Debug, Clone)]
pub struct CheckClient {
    http_client: reqwest::Client,
    check_url: String,
}

impl CheckClient {
    /// Create a client for the server at `base_url`, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("registry-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            check_url: format!("{}/check", base_url.trim_end_matches('/')),
        })
    }

    pub fn check_url(&self) -> &str {
        &self.check_url
    }

    /// Query a single domain.
    pub async fn query(&self, domain: String) -> QueryResult {
        let started = Instant::now();
        let outcome = self.fetch(&domain).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(envelope) => QueryResult {
                domain,
                response: Some(envelope),
                error: None,
                elapsed,
            },
            Err(e) => QueryResult {
                domain,
                response: None,
                error: Some(e.to_string()),
                elapsed,
            },
        }
    }

    async fn fetch(&self, domain: &str) -> Result<Envelope, reqwest::Error> {
        self.http_client
            .get(&self.check_url)
            .query(&[("domain", domain)])
            .send()
            .await?
            .error_for_status()?
            .json::<Envelope>()
            .await
    }

    /// Query all `domains` with at most `concurrency` requests in flight.
    ///
    /// `on_result` sees each result as soon as it completes; the returned
    /// vector is in completion order.
    pub async fn query_all<F>(
        &self,
        domains: Vec<String>,
        concurrency: usize,
        mut on_result: F,
    ) -> Vec<QueryResult>
    where
        F: FnMut(&QueryResult),
    {
        let mut stream = stream::iter(domains)
            .map(|domain| self.query(domain))
            .buffer_unordered(concurrency.max(1));

        let mut results = Vec::new();
        while let Some(result) = stream.next().await {
            on_result(&result);
            results.push(result);
        }
        results
    }
}
