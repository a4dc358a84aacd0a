use super::relay_harness::{RelayTestServer, post_chat, relay_config};
use metabolical::engine::pool_from_config;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn completion(content: &str) -> Value {
    json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn relay_forwards_window_and_sampling_to_engine() {
    let engine = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "temperature": 0.3,
            "top_p": 0.8,
            "max_tokens": 150,
            "stop": ["User:", "You:", "\n\n", "Human:"],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Walk daily. Sleep well. Eat fibre. Drink water. Limit sugar. Rest.",
        )))
        .expect(1)
        .mount(&engine)
        .await;

    let mut config = relay_config();
    config.engine.base_url = engine.uri();
    let pool = Arc::new(pool_from_config(&config.engine));
    let server = RelayTestServer::start_with_pool(config, pool).await;
    let client = reqwest::Client::new();

    let response = post_chat(&client, &server, "How do I stay healthy?", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("reply should be json");
    assert_eq!(
        body["reply"],
        "Walk daily. Sleep well. Eat fibre. Drink water."
    );

    let requests: Vec<Request> = engine
        .received_requests()
        .await
        .expect("request recording enabled");
    let sent: Value = requests[0].body_json().expect("engine request should be json");
    let messages = sent["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "How do I stay healthy?");
}

#[tokio::test]
async fn engine_outage_surfaces_as_generic_error() {
    let engine = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading model weights"))
        .mount(&engine)
        .await;

    let mut config = relay_config();
    config.engine.base_url = engine.uri();
    let pool = Arc::new(pool_from_config(&config.engine));
    let server = RelayTestServer::start_with_pool(config, pool).await;
    let client = reqwest::Client::new();

    let response = post_chat(&client, &server, "hello", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.expect("error body");
    assert!(!body.contains("loading model weights"));
    assert!(body.contains("An internal server error occurred"));
}
