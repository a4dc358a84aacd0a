use super::types::SamplingConfig;
use crate::conversation::Message;
use crate::error::EngineError;
use std::future::Future;
use std::pin::Pin;

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, EngineError>> + Send + 'a>>;

/// External text-generation engine.
///
/// One instance serves one generation at a time; concurrency limits are
/// enforced by [`super::EnginePool`], not by implementors.
pub trait GenerationEngine: Send + Sync {
    /// Engine identifier for logs (e.g. "openai-compat").
    fn name(&self) -> &str;

    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
        sampling: &'a SamplingConfig,
    ) -> CompletionFuture<'a>;
}
