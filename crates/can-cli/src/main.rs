//! CAN interactive shell
//!
//! Starts a partition with one node and drives it from a numbered menu:
//! join random nodes, delete nodes, PUT and GET keys, and draw the zones as
//! an ASCII map.
//!
//! Usage:
//!   can [--seed <n>] [--salt <s>] [--nodes <n>] [--cols <n>] [--rows <n>]
//!
//! Environment:
//!   RUST_LOG  Log filter (default: can_cli=info,can_dht=info). Logs go to
//!             stderr.

mod args;
mod menu;
mod render;
mod report;

use std::io;

use can_dht::{Partition, PartitionConfig};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::CliArgs;
use crate::menu::Session;
use crate::render::MapSize;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "can_cli=info,can_dht=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut can = Partition::new(PartitionConfig::with_salt(args.salt.clone()));
    for _ in 0..args.nodes {
        if let Err(e) = can.add_random_node(&mut rng) {
            warn!(error = %e, "initial join skipped");
        }
    }

    let map = MapSize {
        cols: usize::from(args.cols),
        rows: usize::from(args.rows),
    };
    let mut session = Session::new(can, rng, map, io::stdin().lock(), io::stdout().lock());
    session.run()?;

    Ok(())
}
