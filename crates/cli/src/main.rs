use clap::Parser;

mod commands;
mod synthetic;

use commands::Commands;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Exercise the lumen viewer core with synthetic images", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    lumen_utils::init_with_default(default_filter)
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    cli.command.execute().await
}
