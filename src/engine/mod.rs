pub mod http_client;
pub mod openai_compat;
pub mod pool;
pub mod traits;
pub mod types;

pub use openai_compat::OpenAiCompatEngine;
pub use pool::EnginePool;
pub use traits::{CompletionFuture, GenerationEngine};
pub use types::SamplingConfig;

use crate::config::EngineConfig;
use std::sync::Arc;
use std::time::Duration;

/// Build the process-wide pool from `[engine]`: `workers` handles against
/// the configured endpoint.
pub fn pool_from_config(config: &EngineConfig) -> EnginePool {
    let handles: Vec<Arc<dyn GenerationEngine>> = (0..config.workers.max(1))
        .map(|_| Arc::new(OpenAiCompatEngine::from_config(config)) as Arc<dyn GenerationEngine>)
        .collect();
    let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
    EnginePool::new(handles, timeout)
}
