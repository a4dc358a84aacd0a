use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// HMAC key for session tokens. A random per-process key is used when unset.
    #[serde(default)]
    pub secret: Option<String>,
    /// Absolute session lifetime from issuance (default: 2 hours)
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_lifetime_secs() -> u64 {
    2 * 60 * 60
}

fn default_cookie_name() -> String {
    "metabolical_session".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            lifetime_secs: default_lifetime_secs(),
            cookie_name: default_cookie_name(),
        }
    }
}
