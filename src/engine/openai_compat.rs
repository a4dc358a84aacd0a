//! Engine adapter for OpenAI-compatible chat completion servers.
//!
//! llama.cpp's `llama-server`, Ollama, vLLM and most local runtimes expose
//! `POST /v1/chat/completions`; the model itself stays in that process.

use super::http_client::build_engine_client;
use super::traits::{CompletionFuture, GenerationEngine};
use super::types::SamplingConfig;
use crate::config::EngineConfig;
use crate::conversation::Message;
use crate::error::EngineError;
use crate::utils::text::truncate_with_ellipsis;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

pub struct OpenAiCompatEngine {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    stop: &'a [String],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiCompatEngine {
    pub fn new(base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.map(ToString::to_string),
            client: build_engine_client(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.base_url, &config.model, config.api_key.as_deref())
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        sampling: &'a SamplingConfig,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_tokens,
            stop: &sampling.stop,
            stream: false,
        }
    }

    async fn call_api(
        &self,
        messages: &[Message],
        sampling: &SamplingConfig,
    ) -> Result<String, EngineError> {
        let request = self.build_request(messages, sampling);
        let mut builder = self.client.post(self.completions_url()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Unavailable(format!(
                "HTTP {status}: {}",
                truncate_with_ellipsis(body.trim(), ERROR_BODY_PREVIEW_CHARS)
            )));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        extract_content(&bytes)
    }
}

fn map_transport_error(err: reqwest::Error) -> EngineError {
    if err.is_timeout() {
        EngineError::Timeout { secs: 0 }
    } else {
        EngineError::Unavailable(err.to_string())
    }
}

fn extract_content(body: &[u8]) -> Result<String, EngineError> {
    let parsed: ChatResponse = serde_json::from_slice(body)
        .map_err(|e| EngineError::MalformedOutput(format!("invalid JSON: {e}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| EngineError::MalformedOutput("no choices[0].message.content".into()))
}

impl GenerationEngine for OpenAiCompatEngine {
    fn name(&self) -> &str {
        "openai-compat"
    }

    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
        sampling: &'a SamplingConfig,
    ) -> CompletionFuture<'a> {
        Box::pin(self.call_api(messages, sampling))
    }
}
