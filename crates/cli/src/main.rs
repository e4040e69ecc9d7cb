use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod command;
mod config;

use command::{down, gen_sql, init, new, server, up};

#[derive(Parser)]
#[command(name = "schema-tool")]
#[command(about = "Manage ordered schema migrations with ease", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory to run schema commands in (defaults to the current dir)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Config file (default is $HOME/.schema-tool.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the local alter chain is well formed
    Check,

    /// Create a new alter pair at the end of the chain
    New(new::NewArgs),

    /// Initialize a schema directory with a root alter pair
    Init(init::InitArgs),

    /// Generate a new file ref
    #[command(name = "gen-ref")]
    GenRef,

    /// Generate SQL for one or more alters in chain order
    #[command(name = "gen-sql")]
    GenSql(gen_sql::GenSqlArgs),

    /// Print the ordered SQL that would move a schema forward
    Up(up::UpArgs),

    /// Print the ordered SQL that would roll a schema back
    Down(down::DownArgs),

    /// Start/stop/manage the schema control-plane server
    Server(server::ServerArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = config::load(cli.config.as_deref())?;
    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("could not resolve current directory")?,
    };

    match cli.command {
        Commands::Check => command::check::run(&dir),
        Commands::New(args) => new::run(&dir, &args),
        Commands::Init(args) => init::run(&dir, &args),
        Commands::GenRef => command::gen_ref::run(),
        Commands::GenSql(args) => gen_sql::run(&dir, &args),
        Commands::Up(args) => up::run(&dir, &args),
        Commands::Down(args) => down::run(&dir, &args),
        Commands::Server(args) => server::run(&config, &args).await,
    }
}
