use anyhow::Result;
use clap::Parser;
use gasdash_cli::{cli, commands};
use gasdash_shared::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    // Default to info-level logs; override via RUST_LOG if needed.
    let _guard = init_tracing("info", cli.connection.log_dir.as_deref())?;
    commands::run(cli).await
}
