use perisim::{bench_methods, load_scenario, Engine, OrbitReporter, RunConfig, Scenario, ScenarioConfig};
use perisim::configuration::config::Numeral;

use clap::Parser;
use anyhow::Result;

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Two-body orbit integration at arbitrary precision
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Timestep in seconds [default: 1]
    #[arg(short, long, allow_negative_numbers = true)]
    timestep: Option<String>,

    /// Orbits to simulate, 0 = until interrupted [default: 3]
    #[arg(short, long, allow_negative_numbers = true)]
    number_of_orbits: Option<i64>,

    /// 1 linear, 2 quadratic, 3 quadratic with averaged acceleration [default: 3]
    #[arg(short, long, allow_negative_numbers = true)]
    method: Option<i64>,

    /// Timesteps in the first perihelion window, 0 = 20 [default: 30]
    #[arg(short, long, allow_negative_numbers = true)]
    view: Option<i64>,

    /// Bits of precision, at least 32 [default: 160]
    #[arg(short, long, allow_negative_numbers = true)]
    precision: Option<i64>,

    /// YAML scenario file, command line flags take precedence
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Print a parabola fit for every perihelion window
    #[arg(long)]
    parabola: bool,

    /// Time every method at several precisions instead of simulating
    #[arg(long)]
    bench: bool,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            timestep: self.timestep.as_deref().map(Numeral::from),
            number_of_orbits: self.number_of_orbits,
            method: self.method,
            view: self.view,
            precision: self.precision,
            parabola: self.parabola.then_some(true),
        }
    }
}

// load here to keep main clean
fn build_scenario(args: &Args) -> Result<Scenario, perisim::ConfigError> {
    let mut cfg = match &args.scenario {
        Some(path) => load_scenario(path)?,
        None => ScenarioConfig::default(),
    };
    cfg.run = cfg.run.overlay(args.run_config());
    Scenario::build_scenario(&cfg)
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_methods()?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut scenario = match build_scenario(&args) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let stdout = io::stdout();
    let mut reporter = OrbitReporter::new(BufWriter::new(stdout.lock()), scenario.parameters.parabola)?;
    Engine::default().run(&mut scenario, &mut reporter)?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perisim::ConfigError;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("perisim").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn negative_values_reach_validation() {
        let a = args(&["-n", "-1"]);
        assert_eq!(a.number_of_orbits, Some(-1));
        assert!(matches!(build_scenario(&a), Err(ConfigError::NegativeOrbits)));

        let a = args(&["-t", "-5"]);
        assert_eq!(a.timestep.as_deref(), Some("-5"));
        assert!(matches!(build_scenario(&a), Err(ConfigError::TimestepNotPositive)));

        assert!(matches!(build_scenario(&args(&["--view", "-3"])), Err(ConfigError::NegativeView)));
        assert!(matches!(build_scenario(&args(&["-m", "-2"])), Err(ConfigError::InvalidMethod(-2))));
        assert!(matches!(build_scenario(&args(&["-p", "-64"])), Err(ConfigError::PrecisionTooLow(-64))));
    }

    #[test]
    fn command_line_overrides_defaults() {
        let a = args(&["-t", "60", "-n", "0", "--parabola"]);
        let scenario = build_scenario(&a).unwrap();
        assert_eq!(scenario.parameters.number_of_orbits, 0);
        assert!(scenario.parameters.parabola);
        assert_eq!(scenario.parameters.dt, scenario.parameters.precision.int(60));
    }
}
