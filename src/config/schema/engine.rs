use serde::{Deserialize, Serialize};

/// Connection and sampling settings for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of an OpenAI-compatible chat completion server
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Engine instances behind the pool; each serves one generation at a time
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Per-generation timeout in seconds; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_stop")]
    pub stop: Vec<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".into()
}

fn default_model() -> String {
    "tinyllama-1.1b-chat-v1.0.Q4_K_M.gguf".into()
}

fn default_workers() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f64 {
    0.3
}

fn default_top_p() -> f64 {
    0.8
}

fn default_max_tokens() -> u32 {
    150
}

fn default_stop() -> Vec<String> {
    ["User:", "You:", "\n\n", "Human:"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            workers: default_workers(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            stop: default_stop(),
        }
    }
}
