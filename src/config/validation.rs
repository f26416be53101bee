//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges and cross-field
//! constraints. All errors are collected, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("validator.timeout_secs must be greater than zero")]
    ZeroValidatorTimeout,

    #[error("cookie.max_age_secs must be greater than zero")]
    ZeroCookieMaxAge,

    #[error("cookie.name {0:?} is not a valid cookie name")]
    InvalidCookieName(String),

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("timeouts.request_secs ({request}) must exceed validator.timeout_secs ({validator})")]
    RequestTimeoutTooShort { request: u64, validator: u64 },

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.validator.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValidatorTimeout);
    }

    if config.cookie.max_age_secs == 0 {
        errors.push(ValidationError::ZeroCookieMaxAge);
    }

    if !is_token(&config.cookie.name) {
        errors.push(ValidationError::InvalidCookieName(config.cookie.name.clone()));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    // A registration spends up to the validator timeout waiting on the remote host.
    if config.timeouts.request_secs <= config.validator.timeout_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.timeouts.request_secs,
            validator: config.validator.timeout_secs,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// RFC 7230 `token`: the characters allowed in a cookie name.
pub(crate) fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}
