use super::relay_harness::{
    RelayTestServer, ScriptedEngine, post_chat, relay_config, session_cookie,
};
use metabolical::conversation::MessageRole;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn second_turn_sees_first_exchange_in_order() {
    let engine = Arc::new(ScriptedEngine::new(&[
        "Hello! How can I help?",
        "Try more vegetables.",
    ]));
    let server = RelayTestServer::start(relay_config(), engine.clone()).await;
    let client = reqwest::Client::new();

    let first = post_chat(&client, &server, "Hi", None).await;
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = session_cookie(&first).expect("first turn should issue a session cookie");
    let body: Value = first.json().await.expect("reply should be json");
    assert_eq!(body["reply"], "Hello! How can I help?");

    let second = post_chat(&client, &server, "What should I eat?", Some(&cookie)).await;
    assert_eq!(second.status(), StatusCode::OK);
    let body: Value = second.json().await.expect("reply should be json");
    assert_eq!(body["reply"], "Try more vegetables.");

    let windows = engine.windows();
    assert_eq!(windows.len(), 2);
    let window = &windows[1];
    assert_eq!(window.len(), 4);
    assert_eq!(window[0].role(), MessageRole::System);
    assert!(window[0].content().contains("Metabolical"));
    assert_eq!(
        window[1..]
            .iter()
            .map(|m| (m.role(), m.content()))
            .collect::<Vec<_>>(),
        vec![
            (MessageRole::User, "Hi"),
            (MessageRole::Assistant, "Hello! How can I help?"),
            (MessageRole::User, "What should I eat?"),
        ]
    );
}

#[tokio::test]
async fn without_cookie_every_request_is_a_new_session() {
    let engine = Arc::new(ScriptedEngine::new(&[]));
    let server = RelayTestServer::start(relay_config(), engine.clone()).await;
    let client = reqwest::Client::new();

    for text in ["one", "two", "three"] {
        let response = post_chat(&client, &server, text, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).is_some());
    }

    assert!(engine.windows().iter().all(|window| window.len() == 2));
}

#[tokio::test]
async fn long_sessions_submit_bounded_windows() {
    let engine = Arc::new(ScriptedEngine::new(&[]));
    let server = RelayTestServer::start(relay_config(), engine.clone()).await;
    let client = reqwest::Client::new();

    let first = post_chat(&client, &server, "turn 0", None).await;
    let cookie = session_cookie(&first).expect("session cookie");
    for turn in 1..8 {
        let response = post_chat(&client, &server, &format!("turn {turn}"), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let windows = engine.windows();
    let lengths: Vec<usize> = windows.iter().map(Vec::len).collect();
    assert_eq!(lengths, vec![2, 4, 6, 8, 9, 9, 9, 9]);

    let last = windows.last().expect("at least one window");
    assert_eq!(last[0].role(), MessageRole::System);
    assert_eq!(last[1].role(), MessageRole::Assistant);
    assert_eq!(last[2].content(), "turn 4");
    assert_eq!(last[8].content(), "turn 7");
}

#[tokio::test]
async fn failed_generation_does_not_enter_history() {
    let engine = Arc::new(ScriptedEngine::failing_once("model crashed"));
    let server = RelayTestServer::start(relay_config(), engine.clone()).await;
    let client = reqwest::Client::new();

    let failed = post_chat(&client, &server, "first try", None).await;
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let cookie = session_cookie(&failed).expect("cookie issued even on failure");
    let body: Value = failed.json().await.expect("error should be json");
    assert_eq!(
        body["error"],
        "An internal server error occurred. Please try again."
    );

    let retry = post_chat(&client, &server, "second try", Some(&cookie)).await;
    assert_eq!(retry.status(), StatusCode::OK);

    let windows = engine.windows();
    assert_eq!(windows[1].len(), 2);
    assert_eq!(windows[1][1].content(), "second try");
}

#[tokio::test]
async fn rejected_input_reports_reason() {
    let engine = Arc::new(ScriptedEngine::new(&[]));
    let server = RelayTestServer::start(relay_config(), engine.clone()).await;
    let client = reqwest::Client::new();

    let response = post_chat(&client, &server, "click <a onclick=steal()>", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error should be json");
    assert_eq!(body["error"], "Message contains disallowed content");

    assert!(engine.windows().is_empty());
}

#[tokio::test]
async fn index_page_is_served() {
    let server = RelayTestServer::start(relay_config(), Arc::new(ScriptedEngine::new(&[]))).await;
    let response = reqwest::get(server.url("/"))
        .await
        .expect("index request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-frame-options")
            .and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
    let html = response.text().await.expect("index body");
    assert!(html.contains("<form id=\"chat\">"));
}
