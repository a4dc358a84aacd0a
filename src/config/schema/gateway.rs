use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 5000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Allow binding to non-localhost addresses (default: false)
    #[serde(default)]
    pub allow_public_bind: bool,
    /// Origins allowed to call the chat endpoints with credentials
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Served behind TLS: enables HSTS and `Secure` session cookies
    #[serde(default)]
    pub production: bool,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Whole-request timeout; must outlast the engine timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_gateway_port() -> u16 {
    5000
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5000".into(),
        "http://127.0.0.1:5000".into(),
    ]
}

fn default_max_body_bytes() -> usize {
    65_536
}

fn default_request_timeout_secs() -> u64 {
    180
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            allow_public_bind: false,
            cors_origins: default_cors_origins(),
            production: false,
            max_body_bytes: default_max_body_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
