//! Chainbench CLI - topology, health and height probes for a configured network.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::time::Duration;

use chainbench::{Blockchain, VotingPowerScenario, WaitOptions};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Chainbench CLI - probe a multi-node test network
#[derive(Parser, Debug)]
#[command(name = "chainbench")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Network configuration file (JSON)
    #[arg(short, long, env = "CHAINBENCH_CONFIG")]
    config: PathBuf,

    /// Network name used in logs and output
    #[arg(short, long, default_value = "network")]
    name: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Probes.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Health of every node
    Health,
    /// Liveness of every active, testable node
    Connectivity {
        /// Per-node probe timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Network summary with live height
    Info,
    /// Select validators for a voting-power scenario
    Validators {
        /// less-than-one-third, exactly-one-third or more-than-one-third
        #[arg(long, default_value = "more-than-one-third")]
        scenario: VotingPowerScenario,
    },
    /// Wait for blocks to be produced
    WaitBlocks {
        /// Number of blocks to wait for
        #[arg(long, default_value_t = 1)]
        count: u64,
        /// Node index (default: first active non-boot node)
        #[arg(long)]
        node: Option<u32>,
        /// Give up after this many seconds
        #[arg(long, default_value_t = 600)]
        timeout_secs: u64,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chainbench=debug")
    } else {
        EnvFilter::new("chainbench=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut chain = Blockchain::connect_network_from_config_file(&args.name, &args.config)?;

    match args.command {
        Command::Health => print_json(&chain.health_check().await)?,
        Command::Connectivity { timeout_ms } => {
            let timeout = timeout_ms.map(Duration::from_millis);
            print_json(&chain.test_connectivity(timeout).await)?;
        }
        Command::Info => print_json(&chain.network_info().await)?,
        Command::Validators { scenario } => {
            print_json(&chain.select_validators_by_voting_power(scenario))?;
        }
        Command::WaitBlocks {
            count,
            node,
            timeout_secs,
        } => {
            let options = WaitOptions::blocks().with_timeout(Duration::from_secs(timeout_secs));
            let height = chain.wait_for_blocks(count, node, Some(options)).await?;
            info!(height, "blocks observed");
            print_json(&serde_json::json!({ "height": height }))?;
        }
    }

    chain.cleanup();
    Ok(())
}
