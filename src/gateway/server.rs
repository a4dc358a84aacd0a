use super::handlers::{handle_chat, handle_health, handle_index};
use super::headers::security_headers;
use super::{AppState, SWEEP_INTERVAL_SECS};

use crate::config::{Config, GatewayConfig};
use crate::conversation::ConversationOrchestrator;
use crate::engine::{self, EnginePool};
use crate::session::{InMemorySessionStore, SessionSigner, SessionStore};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{Method, StatusCode, header},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Bind `[gateway] host:port` and serve until Ctrl-C.
pub async fn run_gateway(config: Config) -> Result<()> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;
    if is_public_bind(&host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the relay would be reachable from other machines.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml behind a reverse proxy."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    let engine = Arc::new(engine::pool_from_config(&config.engine));
    run_gateway_with_listener(listener, config, engine).await
}

/// Assemble handler state: session store, signer, orchestrator.
pub fn build_state(config: &Config, engine: Arc<EnginePool>) -> Result<AppState> {
    let lifetime = Duration::from_secs(config.session.lifetime_secs);
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(lifetime));
    let orchestrator = ConversationOrchestrator::from_config(config, sessions, engine)
        .context("build conversation orchestrator")?;

    Ok(AppState {
        orchestrator: Arc::new(orchestrator),
        signer: Arc::new(SessionSigner::from_config(&config.session)),
        session_lifetime: lifetime,
        cookie_name: Arc::from(config.session.cookie_name.as_str()),
        secure_cookies: config.gateway.production,
        admission_key: config.limits.rate_limit_key,
    })
}

/// Serve on a pre-bound listener with the given engine pool.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
    engine: Arc<EnginePool>,
) -> Result<()> {
    let local = listener
        .local_addr()
        .context("get gateway listener local address")?;
    let display_addr = format!("{}:{}", config.gateway.host, local.port());

    let state = build_state(&config, engine)?;
    print_gateway_banner(&display_addr, &config);

    let sweeper = spawn_sweeper(state.clone());
    let app = build_app(state, &config.gateway);
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("serve HTTP gateway");

    sweeper.abort();
    served
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Periodic cleanup of expired sessions and idle admission logs.
fn spawn_sweeper(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match state.orchestrator.sessions().purge_expired().await {
                Ok(purged) if purged > 0 => tracing::debug!(purged, "expired sessions removed"),
                Ok(_) => {}
                Err(error) => tracing::warn!(%error, "session sweep failed"),
            }
            let forgotten = state.orchestrator.admission().sweep(Instant::now());
            if forgotten > 0 {
                tracing::debug!(forgotten, "idle admission logs removed");
            }
        }
    })
}

fn print_gateway_banner(display_addr: &str, config: &Config) {
    println!("Metabolical relay listening on http://{display_addr}");
    println!("  GET  /         -> chat page");
    println!("  POST /chat");
    println!("  POST /api/chat");
    println!("  GET  /health");
    println!("  Engine: {} ({})", config.engine.base_url, config.engine.model);
    if config.gateway.production {
        println!("  Production mode: secure cookies, HSTS");
    }
    if config.session.secret.is_none() {
        println!("  No session secret configured: sessions reset on restart");
    }
}

pub fn build_app(state: AppState, gateway: &GatewayConfig) -> Router {
    let chat = Router::new()
        .route("/chat", post(handle_chat))
        .route("/api/chat", post(handle_chat))
        .layer(cors_layer(&gateway.cors_origins));

    let mut app = Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .merge(chat)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(gateway.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ));

    for (name, value) in security_headers(gateway.production) {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }

    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
