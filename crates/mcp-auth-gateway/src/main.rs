//! MCP Auth Gateway - Entry Point
//!
//! Runs either the forward-auth verification gateway or one tool-domain resource
//! server.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use mcp_auth_gateway::{
    config::{GatewayConfig, ResourceConfig, api, split_list},
    gateway,
    server::McpServer,
    tools::ToolDomain,
};

#[derive(Parser, Debug)]
#[command(name = "mcp-auth-gateway")]
#[command(about = "Forward-auth token gateway and MCP resource servers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the token verification gateway
    Gateway(GatewayArgs),
    /// Run a resource server for one tool domain
    Resource(ResourceArgs),
}

#[derive(clap::Args, Debug)]
struct GatewayArgs {
    /// Authorization server base URL
    #[arg(long, env = "KEYCLOAK_URL", default_value = api::AUTH_SERVER_URL)]
    auth_server_url: Url,

    /// Realm whose tokens are verified
    #[arg(long, env = "KEYCLOAK_REALM", default_value = api::REALM)]
    realm: String,

    /// Confidential client id used for introspection
    #[arg(long, env = "KEYCLOAK_CLIENT_ID", default_value = api::CLIENT_ID)]
    client_id: String,

    /// Confidential client secret used for introspection
    #[arg(long, env = "KEYCLOAK_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// HTTP server port
    #[arg(long, env = "PORT", default_value_t = api::GATEWAY_PORT)]
    port: u16,

    /// Maximum age of cached signing keys, in seconds
    #[arg(long, env = "JWKS_CACHE_TTL_SECS", default_value_t = api::JWKS_CACHE_TTL.as_secs())]
    jwks_cache_ttl_secs: u64,

    /// Domain scopes advertised in the discovery document (comma separated)
    #[arg(long, env = "GATEWAY_EXTRA_SCOPES", value_delimiter = ',')]
    extra_scopes: Option<Vec<String>>,
}

#[derive(clap::Args, Debug)]
struct ResourceArgs {
    /// Tool domain to serve
    #[arg(long, value_enum)]
    domain: ToolDomain,

    /// HTTP server port (default: 8001 for calculator, 8002 for weather)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Scope assumed when the gateway forwarded none (default: the domain scope)
    #[arg(long, env = "MCP_DEFAULT_SCOPE")]
    default_scope: Option<String>,

    /// Treat a missing X-User-Scopes header as no scopes
    #[arg(long, env = "MCP_STRICT_IDENTITY")]
    strict_identity: bool,
}

impl GatewayArgs {
    fn into_config(self) -> GatewayConfig {
        let mut config = GatewayConfig::new(self.auth_server_url, self.realm, self.client_id, self.client_secret);
        config.jwks_cache_ttl = Duration::from_secs(self.jwks_cache_ttl_secs);
        if let Some(scopes) = self.extra_scopes {
            config.extra_scopes = split_list(&scopes.join(","));
        }
        config
    }
}

impl ResourceArgs {
    fn to_config(&self) -> ResourceConfig {
        let config = ResourceConfig::new(self.domain).strict(self.strict_identity);
        match self.default_scope.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(scope) => config.with_default_scope(scope),
            None => config,
        }
    }
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
    // .env must be loaded before clap reads env fallbacks.
    let dotenv_path = dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting MCP auth gateway");

    match cli.command {
        Command::Gateway(args) => {
            let port = args.port;
            let config = args.into_config();
            tracing::info!(port, config = ?config, "Running verification gateway");
            gateway::run_http(config, port).await?;
        }
        Command::Resource(args) => {
            let config = args.to_config();
            let port = args.port.unwrap_or_else(|| config.domain.default_port());
            tracing::info!(
                port,
                domain = ?config.domain,
                default_scope = %config.default_scope,
                strict_identity = config.strict_identity,
                "Running resource server"
            );
            McpServer::new(&config).run_http(port).await?;
        }
    }

    Ok(())
}
