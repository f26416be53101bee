//! Concurrent registrations must not lose updates.

use std::time::{Duration, Instant};
use axum::http::StatusCode;
use reqwest::header::LOCATION;
use bookmark_server::{Registry, ServerConfig};

mod common;

#[tokio::test]
async fn test_concurrent_registrations() {
    // Upstream answers slowly so many validations overlap.
    let upstream = common::start_slow_backend(Duration::from_millis(50)).await;
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let total_requests = 50;
    let start = Instant::now();
    let mut handles = Vec::new();

    for i in 0..total_requests {
        let client = client.clone();
        let url = server.url("/");
        let long_uri = format!("http://{}/page/{}", upstream, i);
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .form(&[("longuri", long_uri), ("shortname", format!("link-{i:02}"))])
                .send()
                .await
                .map(|res| res.status())
        }));
    }

    for handle in handles {
        let status = handle.await.unwrap().expect("Server unreachable");
        assert_eq!(status, StatusCode::SEE_OTHER);
    }
    println!("{} registrations in {:?}", total_requests, start.elapsed());

    assert_eq!(server.registry.len(), total_requests);

    for i in 0..total_requests {
        let res = client.get(server.url(&format!("/link-{i:02}"))).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()[LOCATION],
            format!("http://{}/page/{}", upstream, i).as_str()
        );
    }

    let page = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
    let listed: Vec<&str> = page
        .lines()
        .filter(|line| line.starts_with("link-"))
        .collect();
    assert_eq!(listed.len(), total_requests);
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(listed, sorted);
}

#[tokio::test]
async fn test_reads_during_slow_registration() {
    // A registration stuck on a slow upstream must not block lookups.
    let slow = common::start_slow_backend(Duration::from_secs(2)).await;
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let pending = {
        let client = client.clone();
        let url = server.url("/");
        let long_uri = format!("http://{}/", slow);
        tokio::spawn(async move {
            client
                .post(url)
                .form(&[("longuri", long_uri.as_str()), ("shortname", "slow")])
                .send()
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    let start = Instant::now();
    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(start.elapsed() < Duration::from_secs(1), "form display waited on validation");

    let res = pending.await.unwrap().unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(server.registry.get("slow").is_some());
}
