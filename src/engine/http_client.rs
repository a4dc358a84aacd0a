use reqwest::Client;
use std::time::Duration;

/// HTTP client for engine servers.
///
/// No whole-request timeout: generation time is bounded by the pool's
/// per-call timeout instead.
pub fn build_engine_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}
