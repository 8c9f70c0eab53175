//! Issuebridge CLI - bridges Jira into MCP clients over SSE.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use issuebridge_core::Config;
use issuebridge_jira::JiraClient;
use issuebridge_mcp::{tools::build_registry, BridgeServer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "issuebridge")]
#[command(author, version, about = "Issuebridge - Jira MCP bridge", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server
    Serve {
        /// Port to listen on (overrides the PORT variable)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Serve { port }) => serve(port).await,
        None => {
            println!("Issuebridge - Jira MCP bridge");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

async fn serve(port_override: Option<u16>) -> anyhow::Result<()> {
    // Credentials are validated up front; a misconfigured bridge never
    // gets as far as binding a port.
    let config = Config::from_env()?;
    let port = port_override.unwrap_or(config.port);

    let tracker = Arc::new(JiraClient::new(
        &config.jira_host,
        &config.jira_email,
        &config.jira_api_token,
    ));

    let registry = build_registry(tracker)?;
    tracing::info!(
        host = config.jira_host,
        tools = registry.len(),
        "Starting MCP server on port {}",
        port
    );

    let server = BridgeServer::new(registry);
    server.serve(port).await?;

    Ok(())
}
