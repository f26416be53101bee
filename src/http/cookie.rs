//! Visitor cookie parsing and issuance.
//!
//! The cookie only carries a display name. Nothing about it is stored
//! server-side and a bad cookie never fails a request: it just downgrades
//! the greeting.

use axum::http::header::InvalidHeaderValue;
use axum::http::{header, HeaderMap, HeaderValue};
use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::{form_urlencoded, Host};

use crate::config::CookieConfig;

/// Host used for the `Domain` attribute when the request carries no `Host`.
pub const FALLBACK_DOMAIN: &str = "localhost";

/// Why a `Cookie` header could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieError {
    #[error("invalid value for cookie {0:?}")]
    InvalidValue(String),

    #[error("no {0:?} cookie present")]
    NotFound(String),
}

/// The decoded visitor cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorCookie {
    pub name: String,
}

/// Parse a `Cookie` header value and extract the cookie called `cookie_name`.
///
/// Pairs belonging to other cookies are skipped even when malformed; only
/// the requested cookie has to decode cleanly.
pub fn parse_visitor_cookie(header: &str, cookie_name: &str) -> Result<VisitorCookie, CookieError> {
    // First occurrence wins, as browsers send the most specific cookie first.
    let raw_value = header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .map(|(_, value)| value.trim())
        .ok_or_else(|| CookieError::NotFound(cookie_name.to_string()))?;

    decode_value(raw_value)
        .map(|name| VisitorCookie { name })
        .ok_or_else(|| CookieError::InvalidValue(cookie_name.to_string()))
}

/// Strip optional quotes, check cookie-octets, then form-decode.
fn decode_value(raw: &str) -> Option<String> {
    let inner = match raw.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"')?,
        None => raw,
    };

    let octets_ok = inner
        .bytes()
        .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'));
    if !octets_ok {
        return None;
    }

    // `+` is a space on the way in, so it has to go before `%2B` is decoded.
    let spaced = inner.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Build the `Set-Cookie` value for a visitor name.
///
/// `domain` is the configured domain or, when unset, the serving host.
pub fn build_set_cookie(
    config: &CookieConfig,
    value: &str,
    domain: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    HeaderValue::from_str(&format!(
        "{}={}; Max-Age={}; Domain={}",
        config.name, encoded, config.max_age_secs, domain
    ))
}

/// Serving host for the `Domain` attribute: configured, else `Host` without port.
///
/// A `Host` that does not parse as a domain or IP literal falls back to
/// [`FALLBACK_DOMAIN`], so it can never add attributes to the cookie.
pub fn cookie_domain(config: &CookieConfig, headers: &HeaderMap) -> String {
    if let Some(domain) = &config.domain {
        return domain.clone();
    }

    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(strip_port)
        .and_then(|host| Host::parse(host).ok())
        .map(|host| host.to_string())
        .filter(|host| host.bytes().all(is_host_byte))
        .unwrap_or_else(|| FALLBACK_DOMAIN.to_string())
}

fn is_host_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b':' | b'[' | b']')
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literal: keep the brackets, drop the port.
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

/// What the form page says about the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Greeting {
    /// A valid cookie named the visitor.
    Known(String),
    /// A cookie header was sent but could not be used.
    Unsure,
    /// No cookie header at all.
    Stranger,
}

impl Greeting {
    /// Derive the greeting from the request's `Cookie` header(s).
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let mut values = headers.get_all(header::COOKIE).iter().peekable();
        if values.peek().is_none() {
            return Greeting::Stranger;
        }

        // HTTP/2 may split cookies across several header fields.
        let joined = values
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect::<Vec<_>>()
            .join("; ");

        match parse_visitor_cookie(&joined, cookie_name) {
            Ok(cookie) => Greeting::Known(cookie.name),
            Err(e) => {
                tracing::debug!(error = %e, "Unusable cookie header");
                Greeting::Unsure
            }
        }
    }
}
