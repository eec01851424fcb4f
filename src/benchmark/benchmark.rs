use std::time::Instant;

use crate::arithmetic::real::Elementary;
use crate::configuration::config::{ConfigError, Numeral, RunConfig, ScenarioConfig};
use crate::simulation::integrator::{integrate_step, Method};
use crate::simulation::scenario::Scenario;

/// Precisions compared by the benchmark [bits]
pub const BENCH_PRECISIONS: [u32; 3] = [64, 160, 512];

const BENCH_TICKS: u64 = 2000;
const BENCH_TIMESTEP: &str = "60"; // s

#[derive(Debug, Clone)]
pub struct BenchResult {
    pub method: Method,
    pub bits: u32,
    pub seconds_per_tick: f64,
    pub energy_drift: f64, // (E_end - E_start) / |E_start|
}

/// Time `ticks` steps of `method` at `bits` starting from perihelion
pub fn bench_method(method: Method, bits: u32, ticks: u64) -> Result<BenchResult, ConfigError> {
    let cfg = ScenarioConfig {
        run: RunConfig {
            timestep: Some(Numeral::from(BENCH_TIMESTEP)),
            method: Some(i64::from(method.number())),
            precision: Some(i64::from(bits)),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut scenario = Scenario::build_scenario(&cfg)?;
    let energy_start = scenario.state.specific_energy(&scenario.constants);

    let t0 = Instant::now();
    for _ in 0..ticks {
        integrate_step(&mut scenario.state, &scenario.forces, &scenario.parameters);
    }
    let elapsed = t0.elapsed().as_secs_f64();

    let energy_end = scenario.state.specific_energy(&scenario.constants);
    let drift = (&(&energy_end - &energy_start) / &energy_start).abs();

    Ok(BenchResult {
        method,
        bits,
        seconds_per_tick: elapsed / ticks.max(1) as f64,
        energy_drift: drift.to_f64(),
    })
}

/// Every method at every precision in `BENCH_PRECISIONS`
/// Paste output directly into a spreadsheet to compare
pub fn bench_methods() -> Result<Vec<BenchResult>, ConfigError> {
    println!("method,bits,us_per_tick,relative_energy_drift");

    let mut results = Vec::with_capacity(Method::ALL.len() * BENCH_PRECISIONS.len());
    for method in Method::ALL {
        for bits in BENCH_PRECISIONS {
            // Warm-up
            bench_method(method, bits, BENCH_TICKS / 10)?;

            let r = bench_method(method, bits, BENCH_TICKS)?;
            println!(
                "{},{},{:.3},{:.3e}",
                method.number(),
                r.bits,
                r.seconds_per_tick * 1e6,
                r.energy_drift
            );
            results.push(r);
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averaged_acceleration_keeps_energy_better_than_euler() {
        let euler = bench_method(Method::Euler, 96, 500).unwrap();
        let averaged = bench_method(Method::AveragedAcceleration, 96, 500).unwrap();
        assert_eq!(euler.bits, 96);
        assert!(averaged.energy_drift < euler.energy_drift);
        assert!(euler.seconds_per_tick > 0.0);
    }
}
