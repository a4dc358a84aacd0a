use serde::{Deserialize, Serialize};

/// What identifies a client for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionKeySource {
    /// The signed session cookie's client id
    #[default]
    Session,
    /// The TCP peer address
    Peer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted message, in characters, after trimming
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
    /// Case-insensitive regex patterns that reject a message outright
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: usize,
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
    #[serde(default)]
    pub rate_limit_key: AdmissionKeySource,
}

fn default_max_message_chars() -> usize {
    1000
}

fn default_denylist() -> Vec<String> {
    [
        r"<\s*/?\s*script\b",
        r"<\s*(iframe|object|embed|applet|meta|base)\b",
        r"javascript\s*:",
        r"vbscript\s*:",
        r"data\s*:\s*text/html",
        r"\bon(abort|blur|change|click|contextmenu|dblclick|drag\w*|drop|error|focus\w*|input|key(down|press|up)|load|mouse\w*|pointer\w*|resize|scroll|select|submit|toggle|touch\w*|unload|wheel)\s*=",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_rate_limit_max_requests() -> usize {
    20
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            denylist: default_denylist(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_key: AdmissionKeySource::default(),
        }
    }
}
