use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ConfigArgs, init, serve, tools};

#[derive(Parser, Debug)]
#[command(name = "slate", version, about = "Ticket and todo tracker served over MCP")]
struct Cli {
    /// Log filter (e.g. `debug`, `slate_mcp=trace`). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap the schema, then serve MCP on stdio or HTTP.
    Serve(serve::ServeArgs),

    /// Create or upgrade the database schema and exit.
    Init(ConfigArgs),

    /// Print the tool catalogue.
    Tools {
        /// Print the full `tools/list` payload as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.cmd {
        Command::Serve(args) => serve::run(args).await?,
        Command::Init(args) => init::run(args).await?,
        Command::Tools { json } => tools::run(json)?,
    }

    Ok(())
}

/// Logs go to stderr so that stdout stays reserved for MCP frames.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
