#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use metabolical::config::Config;
use metabolical::conversation::Message;
use metabolical::engine::{CompletionFuture, EnginePool, GenerationEngine, SamplingConfig};
use metabolical::error::EngineError;
use metabolical::gateway::run_gateway_with_listener;
use reqwest::StatusCode;

/// Engine double: replies from a script (then a fixed fallback) and keeps
/// every window it was asked to complete.
pub struct ScriptedEngine {
    replies: Mutex<Vec<Result<String, String>>>,
    windows: Mutex<Vec<Vec<Message>>>,
    delay: Duration,
}

impl ScriptedEngine {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|r| Ok((*r).to_string())).collect()),
            windows: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn failing_once(reason: &str) -> Self {
        Self {
            replies: Mutex::new(vec![Err(reason.to_string())]),
            windows: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn windows(&self) -> Vec<Vec<Message>> {
        self.windows.lock().expect("windows lock").clone()
    }
}

impl GenerationEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
        _sampling: &'a SamplingConfig,
    ) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.windows
                .lock()
                .expect("windows lock")
                .push(messages.to_vec());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.replies.lock().expect("replies lock").pop();
            match next {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(reason)) => Err(EngineError::Unavailable(reason)),
                None => Ok("Okay.".to_string()),
            }
        })
    }
}

/// Test config: fixed secret so cookies verify, loopback bind.
pub fn relay_config() -> Config {
    let mut config = Config::default();
    config.session.secret = Some("integration-secret".to_string());
    config.gateway.host = "127.0.0.1".to_string();
    config
}

pub struct RelayTestServer {
    pub port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl RelayTestServer {
    pub async fn start(config: Config, engine: Arc<dyn GenerationEngine>) -> Self {
        let pool = Arc::new(EnginePool::single(engine, None));
        Self::start_with_pool(config, pool).await
    }

    pub async fn start_with_pool(config: Config, pool: Arc<EnginePool>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral relay listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral relay listener should expose local address")
            .port();

        let handle =
            tokio::spawn(async move { run_gateway_with_listener(listener, config, pool).await });
        wait_until_ready(port).await;

        Self { port, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for RelayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("relay did not become ready on port {port}");
}

/// `name=value` of the session cookie set on `response`, if any.
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
}

/// POST `/chat` carrying `cookie` when given.
pub async fn post_chat(
    client: &reqwest::Client,
    server: &RelayTestServer,
    message: &str,
    cookie: Option<&str>,
) -> reqwest::Response {
    let mut request = client
        .post(server.url("/chat"))
        .json(&serde_json::json!({ "message": message }));
    if let Some(cookie) = cookie {
        request = request.header(reqwest::header::COOKIE, cookie);
    }
    request.send().await.expect("chat request should complete")
}
