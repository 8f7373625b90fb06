//! Headless Monte Carlo localization simulator.
//!
//! Loads a PPM occupancy map (black = free space, anything else = wall),
//! places the robot at a random free pose, and runs filter cycles until the
//! population converges or the cycle cap is hit.
//!
//! ```bash
//! # Defaults
//! disha-mcl --map maps/office.ppm
//!
//! # With a config file and overrides
//! disha-mcl --map maps/office.ppm --config disha-mcl.toml --particles 5000
//! ```

use std::io::Write;

use clap::Parser;
use serde::Deserialize;

use disha_mcl::map::ppm;
use disha_mcl::{FilterConfig, MclFilter};

#[derive(Parser, Debug)]
#[command(name = "disha-mcl")]
#[command(about = "Monte Carlo localization on a PPM occupancy map")]
struct Args {
    /// Path to the PPM map (black = free space, anything else = wall)
    #[arg(short, long)]
    map: String,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of particles (overrides the config file)
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// Random seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of cycles to run
    #[arg(long, default_value_t = 500)]
    cycles: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SimConfig {
    filter: FilterConfig,
}

fn load_config(args: &Args) -> SimConfig {
    let mut config = match &args.config {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(contents) => match basic_toml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("ignoring config file {}: {}", path, e);
                    SimConfig::default()
                }
            },
            Err(e) => {
                log::warn!("cannot read config file {}: {}", path, e);
                SimConfig::default()
            }
        },
        None => SimConfig::default(),
    };

    if let Some(n) = args.particles {
        config.filter.particle_count = n;
    }
    if let Some(seed) = args.seed {
        config.filter.seed = seed;
    }
    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    let config = load_config(&args);

    let map = match ppm::load_map(&args.map) {
        Ok(map) => map,
        Err(e) => {
            log::error!("cannot load map {}: {}", args.map, e);
            std::process::exit(1);
        }
    };
    log::info!("map {}: {}x{}", args.map, map.width(), map.height());

    let mut filter = match MclFilter::new(config.filter, &map) {
        Ok(filter) => filter,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "tracking {} particles (seed {})",
        filter.config().particle_count,
        filter.config().seed
    );

    for cycle in 1..=args.cycles {
        filter.advance_cycle(&map);
        let stats = filter.stats();
        log::debug!(
            "cycle {}: var=({:.1}, {:.1}), relocated {}",
            cycle,
            stats.variance_x,
            stats.variance_y,
            stats.relocated
        );
        if stats.just_localized {
            log::info!("converged on cycle {}", cycle);
            break;
        }
    }

    let robot = filter.robot().pose;
    let best = filter.best_particle().pose;
    let error = ((robot.x - best.x).powi(2) + (robot.y - best.y).powi(2)).sqrt();
    log::info!(
        "X={:.2}, Y={:.2}, th={:.2}, EstX={:.2}, EstY={:.2}, Est_th={:.2}, Error={:.3}",
        robot.x,
        robot.y,
        robot.theta,
        best.x,
        best.y,
        best.theta,
        error
    );
    if !filter.is_localized() {
        log::warn!("population did not converge within {} cycles", args.cycles);
    }
}
