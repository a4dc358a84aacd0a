use super::super::{
    ConversationConfig, EngineConfig, GatewayConfig, LimitsConfig, SessionConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Verbose logging
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Copy safe to print or persist: the session secret is redacted.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.session.secret.is_some() {
            copy.session.secret = Some("***".into());
        }
        if copy.engine.api_key.is_some() {
            copy.engine.api_key = Some("***".into());
        }
        copy
    }
}
