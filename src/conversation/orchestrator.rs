use super::message::{SystemDirective, Transcript};
use super::normalize::normalize;
use super::window::build_window;
use crate::config::Config;
use crate::engine::{EnginePool, SamplingConfig};
use crate::error::RelayError;
use crate::security::{AdmissionController, AdmissionPolicy, InputValidator};
use crate::session::{SessionState, SessionStore, SessionToken};
use crate::utils::text::log_preview;
use std::sync::Arc;

/// Progress of one chat turn, reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Received,
    Validated,
    Admitted,
    WindowBuilt,
    GenerationComplete,
    Normalized,
    Persisted,
    Responded,
}

impl TurnStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Admitted => "admitted",
            Self::WindowBuilt => "window_built",
            Self::GenerationComplete => "generation_complete",
            Self::Normalized => "normalized",
            Self::Persisted => "persisted",
            Self::Responded => "responded",
        }
    }
}

/// Runs one turn end to end: validate, admit, window, generate, normalize,
/// persist. Every failure exits before the session store is written.
pub struct ConversationOrchestrator {
    validator: InputValidator,
    admission: Arc<AdmissionController>,
    sessions: Arc<dyn SessionStore>,
    engine: Arc<EnginePool>,
    directive: SystemDirective,
    history_limit: usize,
    max_sentences: usize,
    sampling: SamplingConfig,
}

impl ConversationOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        validator: InputValidator,
        admission: Arc<AdmissionController>,
        sessions: Arc<dyn SessionStore>,
        engine: Arc<EnginePool>,
        directive: SystemDirective,
        history_limit: usize,
        max_sentences: usize,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            validator,
            admission,
            sessions,
            engine,
            directive,
            history_limit,
            max_sentences,
            sampling,
        }
    }

    /// Wire the orchestrator from config around an existing store and pool.
    pub fn from_config(
        config: &Config,
        sessions: Arc<dyn SessionStore>,
        engine: Arc<EnginePool>,
    ) -> anyhow::Result<Self> {
        Ok(Self::new(
            InputValidator::from_config(&config.limits)?,
            Arc::new(AdmissionController::new(AdmissionPolicy::from_config(
                &config.limits,
            ))),
            sessions,
            engine,
            SystemDirective::new(config.conversation.system_prompt.clone()),
            config.conversation.history_limit,
            config.conversation.max_sentences,
            SamplingConfig::from_config(&config.engine),
        ))
    }

    pub fn admission(&self) -> &Arc<AdmissionController> {
        &self.admission
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn engine(&self) -> &Arc<EnginePool> {
        &self.engine
    }

    pub async fn handle_turn(
        &self,
        session: &SessionToken,
        admission_key: &str,
        raw: &str,
    ) -> Result<String, RelayError> {
        let client = &session.client_id;
        tracing::debug!(%client, stage = TurnStage::Received.as_str(), chars = raw.chars().count());

        let text = self.validator.validate(raw).inspect_err(|reason| {
            tracing::warn!(%client, %reason, preview = %log_preview(raw), "message rejected");
        })?;
        tracing::debug!(%client, stage = TurnStage::Validated.as_str());

        self.admission.check(admission_key).inspect_err(|_| {
            tracing::warn!(%client, key = admission_key, "rate limit exceeded");
        })?;
        tracing::debug!(%client, stage = TurnStage::Admitted.as_str());

        let mut state = self
            .sessions
            .get(client)
            .await?
            .unwrap_or_else(|| SessionState::new(session.issued_at));

        let mut pending: Transcript = state.transcript.clone();
        pending.push_user(&text);
        let window = build_window(&self.directive, &pending, self.history_limit);
        tracing::debug!(%client, stage = TurnStage::WindowBuilt.as_str(), window = window.len());

        let raw_reply = self
            .engine
            .complete(&window, &self.sampling)
            .await
            .inspect_err(|error| {
                tracing::error!(%client, %error, "generation failed");
            })?;
        tracing::debug!(%client, stage = TurnStage::GenerationComplete.as_str());

        let reply = normalize(&raw_reply, self.max_sentences);
        tracing::debug!(%client, stage = TurnStage::Normalized.as_str(), preview = %log_preview(&reply));

        pending.push_assistant(reply.clone());
        state.transcript = pending;
        self.sessions.put(client, state).await?;
        tracing::debug!(%client, stage = TurnStage::Persisted.as_str());

        tracing::info!(%client, stage = TurnStage::Responded.as_str(), "turn complete");
        Ok(reply)
    }
}
