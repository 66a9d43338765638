//! Mean site-frequency spectrum of a population
//! with deleterious mutations affecting cooperation
//! in a continuous snowdrift game.
//!
//! Usage: `social_evol_sfs <SEED>`

use anyhow::Context;
use clap::{value_parser, Arg, Command};
use forrustts_sfs::{expected_sfs, Rng, SocialModel, SocialParams};
use tracing_subscriber::EnvFilter;

const NREPS: u32 = 100;
const NSAM: u32 = 20;
const POPSIZE: u32 = 500;
const THETA: f64 = 50.0;
const RHO: f64 = 50.0;
const DOMINANCE: f64 = 2.0;
const B1: f64 = 0.1;
const B2: f64 = 0.1;
const C1: f64 = 0.005;
const C2: f64 = 0.0025;

fn cli() -> Command {
    Command::new("social_evol_sfs")
        .version(forrustts_sfs::version())
        .about("Mean site-frequency spectrum under snowdrift-game selection")
        .arg(
            Arg::new("seed")
                .help("Random number seed")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i128)),
        )
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = *matches
        .get_one::<i128>("seed")
        .context("missing seed")?;
    let mut rng = Rng::try_new(seed)?;

    let twon = 2.0 * f64::from(POPSIZE);
    let mu = THETA / (2.0 * twon);
    let params = SocialParams::new(
        POPSIZE,
        10 * POPSIZE,
        mu,
        0.1 * mu,
        10.0 / twon,
        DOMINANCE,
        RHO / (2.0 * twon),
        B1,
        B2,
        C1,
        C2,
    );
    let mean = expected_sfs(&mut SocialModel(params), &mut rng, NREPS, NSAM)
        .context("simulation failed")?;
    println!("{mean}");
    Ok(())
}
