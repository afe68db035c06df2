//! Authorization server entry point.
//!
//! Runs the OAuth endpoints standalone; a downstream MCP resource server
//! mounts its routes behind [`mcp_auth::server::AuthServer::protect`].

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mcp_auth::{config::Config, server::AuthServer};

#[derive(Parser, Debug)]
#[command(name = "mcp-auth")]
#[command(about = "OAuth 2.1 authorization server for remote MCP access")]
#[command(version)]
struct Cli {
    /// Public URL of this server as seen by clients
    /// (e.g. https://mcp.example.com), used in metadata and redirects
    #[arg(long, env = "SERVER_URL")]
    server_url: url::Url,

    /// HTTP server port
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Directory for persistent state; omit to keep state in memory only
    #[arg(long, env = "STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Access token lifetime in seconds
    #[arg(long, env = "TOKEN_TTL")]
    token_ttl: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        server_url = %cli.server_url,
        port = cli.port,
        "Starting authorization server"
    );

    let persist_path = cli.state_dir.map(|dir| dir.join("oauth_state.json"));
    if let Some(ref path) = persist_path {
        tracing::info!(path = %path.display(), "Persisting OAuth state");
    }

    let mut config = Config::new(cli.server_url.as_str(), persist_path);
    if let Some(ttl) = cli.token_ttl {
        config = config.with_token_ttl(ttl);
    }

    let server = AuthServer::new(config).await;
    server.run_http(cli.port).await
}
