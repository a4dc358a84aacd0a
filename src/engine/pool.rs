use super::traits::GenerationEngine;
use super::types::SamplingConfig;
use crate::conversation::Message;
use crate::error::EngineError;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Bounded pool of engine handles.
///
/// Each handle serves one generation at a time. Callers wait on the
/// semaphore until a handle is idle; there is no queue bound beyond the
/// server's own request timeout.
///
/// A timed-out call drops only the local future. The remote engine may keep
/// generating, so the handle it returns to the pool can briefly serve two
/// generations at once on the same server.
pub struct EnginePool {
    idle: Mutex<Vec<Arc<dyn GenerationEngine>>>,
    slots: Semaphore,
    capacity: usize,
    timeout: Option<Duration>,
}

/// A checked-out handle. Returned to the pool on drop, including when the
/// generation future is cancelled by a timeout.
struct Lease<'a> {
    pool: &'a EnginePool,
    engine: Option<Arc<dyn GenerationEngine>>,
    _permit: SemaphorePermit<'a>,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            self.pool
                .idle
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(engine);
        }
    }
}

impl EnginePool {
    /// `timeout` of `None` lets a generation run until the engine answers.
    pub fn new(handles: Vec<Arc<dyn GenerationEngine>>, timeout: Option<Duration>) -> Self {
        let capacity = handles.len();
        Self {
            idle: Mutex::new(handles),
            slots: Semaphore::new(capacity),
            capacity,
            timeout,
        }
    }

    /// Pool over one handle, the default deployment.
    pub fn single(engine: Arc<dyn GenerationEngine>, timeout: Option<Duration>) -> Self {
        Self::new(vec![engine], timeout)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn lease(&self) -> Result<Lease<'_>, EngineError> {
        let permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| EngineError::Unavailable("engine pool closed".into()))?;
        let engine = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .ok_or_else(|| EngineError::Unavailable("no idle engine handle".into()))?;
        Ok(Lease {
            pool: self,
            engine: Some(engine),
            _permit: permit,
        })
    }

    pub async fn complete(
        &self,
        messages: &[Message],
        sampling: &SamplingConfig,
    ) -> Result<String, EngineError> {
        let lease = self.lease().await?;
        let Some(engine) = lease.engine.as_ref() else {
            return Err(EngineError::Unavailable("engine handle missing".into()));
        };

        tracing::debug!(
            engine = engine.name(),
            messages = messages.len(),
            "engine call started"
        );
        let call = engine.complete(messages, sampling);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(EngineError::Timeout {
                    secs: limit.as_secs(),
                }),
            },
            None => call.await,
        };

        // Transport-level timeouts carry no duration of their own.
        result.map_err(|err| match (err, self.timeout) {
            (EngineError::Timeout { secs: 0 }, Some(limit)) => EngineError::Timeout {
                secs: limit.as_secs(),
            },
            (err, _) => err,
        })
    }
}
