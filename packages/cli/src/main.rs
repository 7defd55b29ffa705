#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI orchestrator for the price map toolchain.
//!
//! Provides a unified entry point (`price_map_cli`) that lets users
//! interactively select which tool to run (pipeline, ingest, explorer,
//! server) and guides them through the configuration for each.
//!
//! Uses `indicatif-log-bridge` (via [`price_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod explore;
mod pipeline;

use dialoguer::Select;

/// Top-level tool selection for the price map toolchain.
enum Tool {
    RunPipeline,
    Ingest,
    Explore,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::RunPipeline, Self::Ingest, Self::Explore, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunPipeline => "Run full pipeline",
            Self::Ingest => "Ingest data",
            Self::Explore => "Explore town views in the terminal",
            Self::Server => "Start server",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = price_map_cli_utils::init_logger();

    println!("Price Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::RunPipeline => pipeline::run(&multi)?,
        Tool::Ingest => price_map_ingest::interactive::run(&multi)?,
        Tool::Explore => explore::run().await?,
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(price_map_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}
