//! Workspace Pulse - contribution dashboard backend
//!
//! Aggregates commit activity from every registered member workspace:
//! per-repository contribution statistics and a cross-workspace digest of
//! each author's most recent commits.
//!
//! # Usage
//! ```bash
//! workspace-pulse --members-file members.json             # Start server
//! workspace-pulse --members-file members.json --port 8080 # Custom port
//! RUST_LOG=workspace_pulse=debug workspace-pulse ...      # Verbose logging
//! ```

mod aggregate;
mod bitbucket;
mod cache;
mod directory;
mod error;
mod models;
mod routes;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aggregate::WalkPolicy;
use bitbucket::{ApiClient, DEFAULT_API_URL};
use cache::ResponseCache;
use directory::JsonFileDirectory;
use state::AppState;

/// Workspace Pulse - aggregate commit activity across member workspaces
#[derive(Parser, Debug)]
#[command(name = "workspace-pulse")]
#[command(about = "Contribution dashboard backend", long_about = None)]
struct Cli {
    /// JSON export of registered members (name, groupNumber, workspaceName, token)
    #[arg(long, env = "MEMBERS_FILE", value_name = "PATH")]
    members_file: PathBuf,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to run the server on
    #[arg(short, long, env = "PORT", default_value = "4000")]
    port: u16,

    /// Base URL of the upstream REST API
    #[arg(long, env = "BITBUCKET_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Lifetime of cached upstream responses
    #[arg(long, env = "CACHE_TTL_SECS", default_value = "3600")]
    cache_ttl_secs: u64,

    /// Timeout for each upstream request
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "5")]
    request_timeout_secs: u64,

    /// Members walked at once when building the contributor digest
    #[arg(long, env = "WALK_CONCURRENCY", default_value = "1",
          value_parser = clap::value_parser!(u16).range(1..))]
    walk_concurrency: u16,

    /// Stop the contributor walk after this many seconds and return what was gathered
    #[arg(long, env = "WALK_DEADLINE_SECS")]
    walk_deadline_secs: Option<u64>,
}

impl Cli {
    fn walk_policy(&self) -> WalkPolicy {
        WalkPolicy {
            concurrency: usize::from(self.walk_concurrency),
            deadline: self.walk_deadline_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quieter for production)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = ApiClient::new(&cli.api_url, Duration::from_secs(cli.request_timeout_secs))?;
    let directory = JsonFileDirectory::new(&cli.members_file);
    if !directory.path().is_file() {
        eprintln!("✗ Members file not found: {}", directory.path().display());
        std::process::exit(1);
    }

    let state = Arc::new(AppState {
        client,
        cache: Arc::new(ResponseCache::new(Duration::from_secs(cli.cache_ttl_secs))),
        directory: Arc::new(directory),
        walk_policy: cli.walk_policy(),
    });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        api_url = %cli.api_url,
        members_file = %cli.members_file.display(),
        cache_ttl_secs = cli.cache_ttl_secs,
        walk_concurrency = cli.walk_concurrency,
        "server started"
    );
    println!("  Server running on http://{}", addr);

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
