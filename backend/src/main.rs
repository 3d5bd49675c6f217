use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use melos_lib::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
  // Los logs van a stderr: stdout queda para el JSON.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  tracing::debug!(command = ?cli.command, "starting melos v{}", env!("CARGO_PKG_VERSION"));

  let output = melos_lib::run(cli).await?;
  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}
