//! reqwest-backed liveness check.

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::ValidatorConfig;
use crate::observability::metrics;
use crate::validator::{Liveness, Unreachable, UriValidator};

/// Checks URIs with a real outbound GET.
#[derive(Clone)]
pub struct HttpUriValidator {
    client: reqwest::Client,
}

impl HttpUriValidator {
    pub fn new(config: &ValidatorConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, uri: &str, timeout: Duration) -> Liveness {
        let url = match Url::parse(uri) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(url) => {
                return Liveness::Unreachable(Unreachable::InvalidUri(format!(
                    "unsupported scheme {:?}",
                    url.scheme()
                )))
            }
            Err(e) => return Liveness::Unreachable(Unreachable::InvalidUri(e.to_string())),
        };

        // Stored URIs are later sent back verbatim in a Location header.
        if HeaderValue::from_str(uri).is_err() {
            return Liveness::Unreachable(Unreachable::InvalidUri(
                "not usable as a Location header".to_string(),
            ));
        }

        match self.client.get(url).timeout(timeout).send().await {
            Ok(response) if response.status() == StatusCode::OK => Liveness::Reachable,
            Ok(response) => Liveness::Unreachable(Unreachable::Status(response.status().as_u16())),
            Err(e) => Liveness::Unreachable(classify(&e)),
        }
    }
}

fn classify(error: &reqwest::Error) -> Unreachable {
    if error.is_timeout() {
        Unreachable::Timeout
    } else if error.is_connect() {
        Unreachable::Connect(error.to_string())
    } else if error.is_builder() {
        Unreachable::InvalidUri(error.to_string())
    } else {
        Unreachable::Request(error.to_string())
    }
}

#[async_trait]
impl UriValidator for HttpUriValidator {
    async fn check(&self, uri: &str, timeout: Duration) -> Liveness {
        let start = Instant::now();
        let liveness = self.fetch(uri, timeout).await;

        match &liveness {
            Liveness::Reachable => tracing::debug!(uri = %uri, "Liveness check passed"),
            Liveness::Unreachable(reason) => {
                tracing::warn!(uri = %uri, reason = %reason, "Liveness check failed")
            }
        }
        metrics::record_liveness_check(liveness.outcome(), start.elapsed());

        liveness
    }
}
