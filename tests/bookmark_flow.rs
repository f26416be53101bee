//! End-to-end request flows against a running server and real upstreams.

use std::time::Duration;
use axum::http::StatusCode;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use bookmark_server::{Registry, ServerConfig};

mod common;

#[tokio::test]
async fn test_register_and_redirect() {
    let upstream = common::start_backend(200).await;
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();
    let long_uri = format!("http://{}/article", upstream);

    let res = client
        .post(server.url("/"))
        .form(&[("yourname", "Ann"), ("longuri", long_uri.as_str()), ("shortname", "ex")])
        .send()
        .await
        .expect("Server unreachable");

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[LOCATION], "/");
    let cookie = res.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("yourname=Ann;"), "unexpected cookie {cookie}");
    assert!(cookie.contains("Max-Age=600"));
    assert!(cookie.contains("Domain=127.0.0.1"));

    let res = client.get(server.url("/ex")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[LOCATION], long_uri.as_str());

    // The cookie comes back as a greeting on the form page.
    let pair = cookie.split(';').next().unwrap().to_string();
    let res = client.get(server.url("/")).header(COOKIE, pair).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page = res.text().await.unwrap();
    assert!(page.contains(&format!("ex : {}", long_uri)));
    assert!(page.contains("Hey there, Ann"));
}

#[tokio::test]
async fn test_dead_upstream_is_not_registered() {
    let upstream = common::start_backend(404).await;
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client
        .post(server.url("/"))
        .form(&[
            ("yourname", "Ann"),
            ("longuri", format!("http://{}/gone", upstream).as_str()),
            ("shortname", "gone"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get(SET_COOKIE).is_none());
    assert!(server.registry.is_empty());

    let res = client.get(server.url("/gone")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "I don't know 'gone'.");

    let page = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(!page.contains("gone :"));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = common::start_slow_backend(Duration::from_secs(4)).await;
    let mut config = ServerConfig::default();
    config.validator.timeout_secs = 1;
    let server = common::start_server(config).await;
    let client = common::client();

    let res = client
        .post(server.url("/"))
        .form(&[("longuri", format!("http://{}/", upstream).as_str()), ("shortname", "slow")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(server.registry.get("slow").is_none());
}

#[tokio::test]
async fn test_missing_fields() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client
        .post(server.url("/"))
        .form(&[("yourname", "Ann"), ("longuri", "https://example.com")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().get(SET_COOKIE).is_none());
    assert!(res.text().await.unwrap().contains("Missing form fields"));
    assert!(server.registry.is_empty());
}

#[tokio::test]
async fn test_reregistration_overwrites() {
    let first = common::start_backend(200).await;
    let second = common::start_backend(200).await;
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    for upstream in [first, second] {
        let res = client
            .post(server.url("/"))
            .form(&[("longuri", format!("http://{}/", upstream).as_str()), ("shortname", "home")])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    let res = client.get(server.url("/home")).send().await.unwrap();
    assert_eq!(res.headers()[LOCATION], format!("http://{}/", second).as_str());
    assert_eq!(server.registry.len(), 1);
}

#[tokio::test]
async fn test_unknown_name_and_request_id() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/unknown-name")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("x-request-id"));
    assert!(res.text().await.unwrap().contains("unknown-name"));
}

#[tokio::test]
async fn test_undecodable_short_name_is_not_found() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/%FF")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "I don't know '\u{FFFD}'.");
}

#[tokio::test]
async fn test_greeting_survives_other_sites_cookies() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    for header in ["theme=a,b; yourname=Ann", "yourname=Ann; prefs={\"a\": 1}"] {
        let res = client.get(server.url("/")).header(COOKIE, header).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.text().await.unwrap().contains("Hey there, Ann"), "cookie {header}");
    }
}

#[tokio::test]
async fn test_configured_cookie_domain() {
    let upstream = common::start_backend(200).await;
    let mut config = ServerConfig::default();
    config.cookie.domain = Some("bookmarks.example".into());
    let server = common::start_server(config).await;
    let client = common::client();

    let res = client
        .post(server.url("/"))
        .form(&[
            ("yourname", "Bo"),
            ("longuri", format!("http://{}/", upstream).as_str()),
            ("shortname", "b"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(
        res.headers()[SET_COOKIE],
        "yourname=Bo; Max-Age=600; Domain=bookmarks.example"
    );
}
