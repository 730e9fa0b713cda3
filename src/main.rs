//! Dropwalk CLI: drop local paths on a simulated target and print what the consumers receive.

use anyhow::Result;
use clap::Parser;
use dropwalk::engine::arg_parser::Cli;
use dropwalk::engine::handle_run;
use std::time::Instant;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli).await?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
