use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use metabolical::Config;
use tracing::info;

/// Resolve the effective config: file (explicit or default), then env,
/// then command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };
    config.apply_env_overrides();

    if cli.debug {
        config.debug = true;
    }
    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.gateway.port = *port;
        }
        if let Some(host) = host {
            config.gateway.host.clone_from(host);
        }
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { .. } => {
            info!(
                host = %config.gateway.host,
                port = config.gateway.port,
                engine = %config.engine.base_url,
                "starting relay"
            );
            metabolical::gateway::run_gateway(config).await
        }
        Commands::Config => {
            let rendered = toml::to_string_pretty(&config.redacted())
                .context("serialize effective config")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
