use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use reusable_state::app::AppContext;
use reusable_state::store::TracingNotifier;
use reusable_state::telemetry;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    telemetry::init_tracing();

    let ctx = AppContext::load(args.config, Arc::new(TracingNotifier))
        .context("Failed to initialize")?;
    let output = cli::run(&ctx, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
