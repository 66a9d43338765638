//! Mean site-frequency spectrum of a neutral
//! Wright-Fisher population.
//!
//! Usage: `wf_sfs <SEED>`
//!
//! Set `RUST_LOG=info` (or `debug`) to follow
//! progress on stderr.

use anyhow::Context;
use clap::{value_parser, Arg, Command};
use forrustts_sfs::{expected_sfs, NeutralModel, Rng, SimulationParams};
use tracing_subscriber::EnvFilter;

const NREPS: u32 = 100;
const NSAM: u32 = 20;
const POPSIZE: u32 = 500;
const THETA: f64 = 50.0;
const RHO: f64 = 50.0;

fn cli() -> Command {
    Command::new("wf_sfs")
        .version(forrustts_sfs::version())
        .about("Mean site-frequency spectrum of a neutral Wright-Fisher population")
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

    let fourn = 4.0 * f64::from(POPSIZE);
    let params = SimulationParams::new(POPSIZE, 10 * POPSIZE, THETA / fourn, RHO / fourn);
    let mean = expected_sfs(&mut NeutralModel(params), &mut rng, NREPS, NSAM)
        .context("simulation failed")?;
    println!("{mean}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_seed_reaches_rng() {
        let matches = cli().try_get_matches_from(["wf_sfs", "-1"]).unwrap();
        let seed = *matches.get_one::<i128>("seed").unwrap();
        assert_eq!(seed, -1);
        assert!(matches!(
            Rng::try_new(seed),
            Err(forrustts_sfs::RngError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_seed_is_required() {
        assert!(cli().try_get_matches_from(["wf_sfs"]).is_err());
        assert!(cli().try_get_matches_from(["wf_sfs", "1", "2"]).is_err());
    }
}
