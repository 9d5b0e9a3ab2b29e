mod cli;
mod config;
mod walkthrough;

use clap::Parser;
use tracing::info;

use crate::{cli::Args, config::DemoConfig, walkthrough::Walkthrough};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config
    let cfg = DemoConfig::from_args(Args::parse())?;

    // 2) Logger
    defer_observe::logger_init(&cfg.logger)?;
    info!(
        routines = cfg.routines.len(),
        offline = cfg.offline,
        format = %cfg.logger.format,
        "logger initialized"
    );

    // 3) Document
    let document = walkthrough::build_document(&cfg);
    info!(document = document.name(), "document ready");

    // 4) Routines
    let verdicts = Walkthrough::new(cfg, document).run().await;
    let rejected = verdicts
        .iter()
        .filter(|(_, v)| matches!(v, walkthrough::Verdict::Rejected(_)))
        .count();
    info!(total = verdicts.len(), rejected, "walkthrough finished");

    Ok(())
}
