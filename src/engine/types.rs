use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};

/// Fixed per-process sampling settings sent with every generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

impl SamplingConfig {
    pub fn from_config(engine: &EngineConfig) -> Self {
        Self {
            temperature: engine.temperature,
            top_p: engine.top_p,
            max_tokens: engine.max_tokens,
            stop: engine.stop.clone(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
