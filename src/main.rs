//! Marga - viewpoint mission planner
//!
//! Plans a photography mission over the configured obstacles and logs the
//! resulting primitive batches.
//!
//! ```text
//! marga [config.toml] [--message "ALG,0,7,18,West,..."]
//! ```
//!
//! Without a config path `marga.toml` in the working directory is used if
//! present, otherwise the built-in defaults. `--message` replaces the
//! configured obstacles with an operator console obstacle message.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marga::{CoordinateFrame, LegStatus, MargaConfig, Result, parse_obstacle_message};

const DEFAULT_CONFIG: &str = "marga.toml";

/// Plan a viewpoint photography mission
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to marga.toml if present)
    config: Option<PathBuf>,

    /// Operator console obstacle message, e.g. "ALG,0,7,18,West"
    /// Replaces the configured obstacles
    #[arg(short, long)]
    message: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::from_default_env();
    let filter = match "marga=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from {:?}", config_path);
        MargaConfig::load(config_path)?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        info!("Loading configuration from {}", DEFAULT_CONFIG);
        MargaConfig::load(Path::new(DEFAULT_CONFIG))?
    } else {
        info!("Using default configuration");
        MargaConfig::default()
    };

    let obstacles = match &args.message {
        Some(message) => {
            info!("Reading obstacles from console message");
            parse_obstacle_message(message)?
        }
        None => config.obstacles()?,
    };
    info!("Planning mission over {} obstacles", obstacles.len());

    let plan = config.planner().plan(&obstacles)?;

    for leg in &plan.legs {
        match &leg.status {
            LegStatus::Failed(reason) => {
                warn!("Obstacle {}: no batch ({})", leg.obstacle_id, reason);
            }
            status => {
                let names: Vec<String> = leg.primitives.iter().map(|p| p.to_string()).collect();
                info!(
                    "Obstacle {} ({:?}): {}",
                    leg.obstacle_id,
                    status,
                    names.join(",")
                );
            }
        }
    }

    for id in &plan.dropped {
        warn!("Obstacle {} has no reachable viewpoint inside the arena", id);
    }

    let end = plan.final_state.in_frame(CoordinateFrame::BottomLeft);
    info!(
        "Robot ends at {} facing {} ({} batches)",
        end.position,
        end.bearing,
        plan.batches().count()
    );

    Ok(())
}
