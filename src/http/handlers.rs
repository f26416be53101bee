//! Request flows: form display, redirect lookup, registration.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use std::time::{Duration, Instant};
use url::form_urlencoded;

use crate::http::cookie::{build_set_cookie, cookie_domain, Greeting};
use crate::http::form::render_form;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Fields of a submitted registration form.
///
/// Blank values count as absent; a repeated field keeps its first value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub your_name: Option<String>,
    pub long_uri: Option<String>,
    pub short_name: Option<String>,
}

impl RegistrationForm {
    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in form_urlencoded::parse(body) {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "yourname" => &mut form.your_name,
                "longuri" => &mut form.long_uri,
                "shortname" => &mut form.short_name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        form
    }
}

/// 303 See Other to `location`.
fn see_other(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location = %location, error = %e, "Location is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /`: the submission form, greeting and current listing.
pub async fn show_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();

    let greeting = Greeting::from_headers(&headers, &state.config.cookie.name);
    let entries = state.registry.snapshot();

    tracing::debug!(entries = entries.len(), greeting = ?greeting, "Rendering form");
    metrics::record_request("form", StatusCode::OK.as_u16(), start);

    Html(render_form(&greeting, &entries)).into_response()
}

/// Short name addressed by a request path: leading `/` dropped, percent-decoded.
///
/// Escapes that are not UTF-8 decode to U+FFFD instead of failing the request.
pub fn short_name_from_path(path: &str) -> String {
    let raw = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// `GET /<name>`: redirect to the registered URI.
pub async fn resolve(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();
    let short_name = short_name_from_path(uri.path());

    let response = match state.registry.get(&short_name) {
        Some(long_uri) => {
            tracing::debug!(short_name = %short_name, long_uri = %long_uri, "Redirecting");
            see_other(&long_uri)
        }
        None => {
            tracing::debug!(short_name = %short_name, "Unknown short name");
            (StatusCode::NOT_FOUND, format!("I don't know '{}'.", short_name)).into_response()
        }
    };

    metrics::record_request("redirect", response.status().as_u16(), start);
    response
}

/// `POST /...`: validate the long URI and register it.
pub async fn register(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let start = Instant::now();
    let response = register_inner(&state, &headers, &body).await;
    metrics::record_request("register", response.status().as_u16(), start);
    response
}

async fn register_inner(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Response {
    let form = RegistrationForm::parse(body);

    let (long_uri, short_name) = match (form.long_uri, form.short_name) {
        (Some(long_uri), Some(short_name)) => (long_uri, short_name),
        _ => {
            tracing::info!("Registration rejected: missing form fields");
            return (StatusCode::BAD_REQUEST, "Missing form fields!").into_response();
        }
    };

    let timeout = Duration::from_secs(state.config.validator.timeout_secs);
    let liveness = state.validator.check(&long_uri, timeout).await;
    if !liveness.is_reachable() {
        tracing::info!(
            short_name = %short_name,
            long_uri = %long_uri,
            outcome = liveness.outcome(),
            "Registration rejected: URI not reachable"
        );
        return (
            StatusCode::NOT_FOUND,
            format!("Couldn't fetch URI '{}'. Sorry!", long_uri),
        )
            .into_response();
    }

    tracing::info!(short_name = %short_name, long_uri = %long_uri, "Registered");
    state.registry.put(short_name, long_uri);

    let mut response = see_other("/");
    if let Some(your_name) = form.your_name {
        let domain = cookie_domain(&state.config.cookie, headers);
        match build_set_cookie(&state.config.cookie, &your_name, &domain) {
            Ok(cookie) => {
                response.headers_mut().insert(header::SET_COOKIE, cookie);
            }
            Err(e) => tracing::warn!(domain = %domain, error = %e, "Could not build visitor cookie"),
        }
    }
    response
}
