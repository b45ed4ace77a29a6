//! Portico console: bootstraps an operator session against the
//! authentication backend and reports what that session may reach.

mod config;
mod navigation;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use portico_auth::gate::SessionGate;
use portico_auth::guard::RouteGuard;
use portico_auth::refresher::CredentialRefresher;
use portico_auth::service::SessionService;
use portico_auth::store::CredentialStore;
use portico_client::HttpAuthBackend;
use portico_core::error::{PorticoError, PorticoResult};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ConsoleConfig;
use crate::report::SessionReport;

#[derive(Debug, Parser)]
#[command(name = "portico", version, about = "Bootstrap a console session and show what it may reach")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `client.base_url`
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Override `client.refresh_token_file`
    #[arg(long)]
    refresh_token_file: Option<PathBuf>,

    /// Page path to run through the route guard (repeatable)
    #[arg(short, long = "page")]
    pages: Vec<String>,

    /// Re-fetch the actor's role after bootstrap
    #[arg(long)]
    reload_role: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("portico=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Console bootstrap failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> PorticoResult<()> {
    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }
    if let Some(path) = cli.refresh_token_file {
        config.client.refresh_token_file = Some(path);
    }

    info!(base_url = %config.client.base_url, "Starting portico console");

    let backend = HttpAuthBackend::new(config.client.clone()).map_err(PorticoError::from)?;
    let store = CredentialStore::new();
    let refresher = CredentialRefresher::new(backend.clone(), store.clone(), &config.auth);
    let gate = SessionGate::new(refresher);

    let ctx = gate.resolve().await;

    if cli.reload_role && ctx.session().is_authenticated() {
        let service = SessionService::new(Arc::new(backend), store);
        match service.reload_role().await {
            Ok(user) => info!(role = %user.role.name, "Role reloaded"),
            Err(e) => warn!(error = %e, "Keeping role from bootstrap"),
        }
    }

    let guard = RouteGuard::new(&config.auth);
    let report = SessionReport::build(&ctx, &guard, &config.navigation(), &cli.pages);
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| PorticoError::Internal(e.to_string()))?;
    println!("{json}");
    Ok(())
}
