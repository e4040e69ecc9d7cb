use anyhow::Result;
use clap::{Args, Subcommand};

use schema_server::ServerConfig;

use crate::config::Config;

#[derive(Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub action: ServerAction,
}

#[derive(Subcommand)]
pub enum ServerAction {
    /// Start the schema server (blocks until interrupted)
    Start(StartArgs),
}

#[derive(Args)]
pub struct StartArgs {
    /// Port to listen on (0 picks a free port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Run the HTTP control plane. The server exposes the same scanning and
/// validation used by the other commands, which makes it the programmatic
/// way to interact with the tool.
pub async fn run(config: &Config, args: &ServerArgs) -> Result<()> {
    match &args.action {
        ServerAction::Start(start) => {
            let port = start.port.or(config.server_port).unwrap_or(0);
            log::info!("Initializing schema server...");
            schema_server::start(ServerConfig { port }).await
        }
    }
}
