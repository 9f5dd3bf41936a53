//! Listener and drain behaviour over real sockets.

mod common;

use axum::{routing::get, Router};
use std::time::Duration;

use log_monitor::lifecycle::{start, DrainOutcome, LifecyclePhase, RunningServer};
use log_monitor::net::ListenerError;

fn slow_app(delay: Duration) -> Router {
    Router::new().route(
        "/slow",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "done"
        }),
    )
}

async fn wait_for_in_flight(server: &RunningServer, expected: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while server.in_flight() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("request never arrived");
}

#[tokio::test]
async fn in_flight_request_completes_during_drain() {
    let server = start("127.0.0.1:0", slow_app(Duration::from_millis(300)))
        .await
        .unwrap();
    let url = format!("http://{}/slow", server.local_addr());

    let client = tokio::spawn(async move { reqwest::get(url).await?.text().await });
    wait_for_in_flight(&server, 1).await;

    let outcome = server.shutdown(Duration::from_secs(5)).await;
    assert_eq!(outcome, DrainOutcome::Drained);
    assert_eq!(client.await.unwrap().unwrap(), "done");
}

#[tokio::test]
async fn drain_deadline_abandons_slow_request() {
    let server = start("127.0.0.1:0", slow_app(Duration::from_secs(30)))
        .await
        .unwrap();
    let url = format!("http://{}/slow", server.local_addr());

    let client = tokio::spawn(async move { reqwest::get(url).await });
    wait_for_in_flight(&server, 1).await;

    let mut phase = server.watch_phase();
    let started = std::time::Instant::now();
    let outcome = server.shutdown(Duration::from_millis(200)).await;

    assert_eq!(outcome, DrainOutcome::TimedOut { abandoned: 1 });
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(*phase.borrow_and_update(), LifecyclePhase::Stopped);
    client.abort();
}

#[tokio::test]
async fn stopped_server_refuses_connections() {
    let server = start("127.0.0.1:0", slow_app(Duration::ZERO)).await.unwrap();
    let url = format!("http://{}/slow", server.local_addr());

    assert_eq!(reqwest::get(&url).await.unwrap().text().await.unwrap(), "done");
    assert_eq!(server.shutdown(Duration::from_secs(5)).await, DrainOutcome::Drained);

    assert!(reqwest::get(&url).await.is_err());
}

#[tokio::test]
async fn occupied_port_fails_start() {
    let first = start("127.0.0.1:0", slow_app(Duration::ZERO)).await.unwrap();
    let taken = first.local_addr().to_string();

    let err = start(&taken, slow_app(Duration::ZERO)).await.unwrap_err();
    assert!(matches!(err, ListenerError::Bind(_)));
    assert!(err.to_string().starts_with("Failed to bind"));

    first.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn full_app_serves_over_socket() {
    let app = common::app();
    let server = start("127.0.0.1:0", app.router).await.unwrap();
    let base = format!("http://{}", server.local_addr());

    let res = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.headers()["x-frame-options"], "DENY");
    assert!(res.headers().contains_key("x-request-id"));

    let res = reqwest::get(format!("{base}/logs")).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);

    assert_eq!(server.shutdown(Duration::from_secs(5)).await, DrainOutcome::Drained);
}
