//! URI liveness checking.
//!
//! # Data Flow
//! ```text
//! Registration flow
//!     → UriValidator::check(uri, timeout)
//!     → one GET against the URI (no retry)
//!     → Liveness::Reachable        (final status exactly 200)
//!     → Liveness::Unreachable(why) (anything else, including errors)
//! ```
//!
//! # Design Decisions
//! - Network and request-construction errors are folded into `Unreachable`;
//!   nothing here propagates as a fault
//! - Stateless: the same validator is shared by every request

pub mod client;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use client::HttpUriValidator;

/// Outcome of a liveness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    Reachable,
    Unreachable(Unreachable),
}

impl Liveness {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Liveness::Reachable)
    }

    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Liveness::Reachable => "reachable",
            Liveness::Unreachable(Unreachable::Status(_)) => "bad_status",
            Liveness::Unreachable(Unreachable::Timeout) => "timeout",
            Liveness::Unreachable(Unreachable::Connect(_)) => "connect_error",
            Liveness::Unreachable(Unreachable::InvalidUri(_)) => "invalid_uri",
            Liveness::Unreachable(Unreachable::Request(_)) => "request_error",
        }
    }
}

/// Why a URI was judged unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unreachable {
    #[error("responded with status {0}")]
    Status(u16),

    #[error("timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid URI: {0}")]
    InvalidUri(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Decides whether a candidate URI is currently reachable.
#[async_trait]
pub trait UriValidator: Send + Sync {
    /// Issue a single GET against `uri`, bounded by `timeout`.
    async fn check(&self, uri: &str, timeout: Duration) -> Liveness;
}
