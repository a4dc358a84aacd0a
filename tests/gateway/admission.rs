use super::relay_harness::{
    RelayTestServer, ScriptedEngine, post_chat, relay_config, session_cookie,
};
use metabolical::config::AdmissionKeySource;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

const RATE_LIMITED: &str = "Rate limit exceeded. Please wait a moment before sending more messages.";

#[tokio::test]
async fn twenty_first_request_in_window_is_rejected() {
    let engine = Arc::new(ScriptedEngine::new(&[]));
    let server = RelayTestServer::start(relay_config(), engine.clone()).await;
    let client = reqwest::Client::new();

    let first = post_chat(&client, &server, "message 1", None).await;
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = session_cookie(&first).expect("session cookie");

    for n in 2..=20 {
        let response = post_chat(&client, &server, &format!("message {n}"), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "request {n} should be admitted");
    }

    let limited = post_chat(&client, &server, "message 21", Some(&cookie)).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = limited.json().await.expect("error should be json");
    assert_eq!(body["error"], RATE_LIMITED);

    assert_eq!(engine.windows().len(), 20);
}

#[tokio::test]
async fn other_sessions_keep_their_own_budget() {
    let mut config = relay_config();
    config.limits.rate_limit_max_requests = 2;
    let server = RelayTestServer::start(config, Arc::new(ScriptedEngine::new(&[]))).await;
    let client = reqwest::Client::new();

    let first = post_chat(&client, &server, "a", None).await;
    let alice = session_cookie(&first).expect("session cookie");
    post_chat(&client, &server, "b", Some(&alice)).await;
    let limited = post_chat(&client, &server, "c", Some(&alice)).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

    let bob = post_chat(&client, &server, "hi", None).await;
    assert_eq!(bob.status(), StatusCode::OK);
}

#[tokio::test]
async fn peer_keyed_admission_limits_cookieless_clients() {
    let mut config = relay_config();
    config.limits.rate_limit_max_requests = 3;
    config.limits.rate_limit_key = AdmissionKeySource::Peer;
    let server = RelayTestServer::start(config, Arc::new(ScriptedEngine::new(&[]))).await;
    let client = reqwest::Client::new();

    for n in 1..=3 {
        let response = post_chat(&client, &server, &format!("q{n}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let limited = post_chat(&client, &server, "q4", None).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn concurrent_requests_never_exceed_budget() {
    let engine = Arc::new(ScriptedEngine::new(&[]));
    let server = Arc::new(RelayTestServer::start(relay_config(), engine.clone()).await);
    let client = reqwest::Client::new();

    let seed = post_chat(&client, &server, "seed", None).await;
    let cookie = session_cookie(&seed).expect("session cookie");

    let mut tasks = Vec::new();
    for n in 0..30 {
        let client = client.clone();
        let server = Arc::clone(&server);
        let cookie = cookie.clone();
        tasks.push(tokio::spawn(async move {
            post_chat(&client, &server, &format!("burst {n}"), Some(&cookie))
                .await
                .status()
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.expect("request task should finish") {
            StatusCode::OK => admitted += 1,
            StatusCode::TOO_MANY_REQUESTS => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    // The seed request used one slot of the budget.
    assert_eq!(admitted, 19);
    assert_eq!(rejected, 11);
}
