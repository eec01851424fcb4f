//! The simulation loop
//!
//! One tick = classify the current state against the perihelion window,
//! report it if inside, then advance the state by one step. The loop ends when
//! the window reports the orbit target as passed, or after `tick_limit` ticks
//! if one is set. With an orbit target of 0 and no tick limit it runs until
//! the process is stopped.
//!
//! Progress lines go to the log (stderr), the orbit table to the reporter.

use std::io::Write;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::Result;
use crate::simulation::integrator::integrate_step;
use crate::simulation::reporter::OrbitReporter;
use crate::simulation::scenario::Scenario;
use crate::simulation::window::WindowTick;

pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    OrbitTarget, // window passed the configured number of orbits
    TickLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub orbits: usize, // windows opened, the priming window included
    pub rows: u64,
    pub stop: StopReason,
}

/// Runtime settings of the loop itself
#[derive(Debug, Clone)]
pub struct Engine {
    pub tick_limit: Option<u64>,      // None = until the orbit target is reached
    pub progress_interval: Duration,  // between progress lines
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            tick_limit: None,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl Engine {
    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    pub fn run<W: Write>(&self, scenario: &mut Scenario, reporter: &mut OrbitReporter<W>) -> Result<RunSummary> {
        announce(scenario);

        let started = Instant::now();
        let mut next_progress = self.progress_interval;
        let mut ticks: u64 = 0;

        let stop = loop {
            let anomaly = scenario.state.true_anomaly_f64();
            match scenario.window.observe(anomaly) {
                WindowTick::Entered { orbit } => {
                    info!("orbit {orbit}");
                    reporter.header()?;
                    reporter.row(orbit, &scenario.state, &scenario.constants)?;
                }
                WindowTick::Sample => {
                    let orbit = scenario.window.orbits_completed();
                    reporter.row(orbit, &scenario.state, &scenario.constants)?;
                }
                WindowTick::Left { finished } => {
                    reporter.separator(&scenario.constants)?;
                    debug!("window closed after {ticks} ticks");
                    if finished {
                        break StopReason::OrbitTarget;
                    }
                }
                WindowTick::Outside => {}
            }

            let elapsed = started.elapsed();
            if elapsed >= next_progress {
                progress(scenario, elapsed, anomaly);
                next_progress = elapsed + self.progress_interval;
            }

            integrate_step(&mut scenario.state, &scenario.forces, &scenario.parameters);
            ticks += 1;

            if self.tick_limit.is_some_and(|limit| ticks >= limit) {
                // close an open table so the output stays well formed
                if scenario.window.points_in_window() > 0 {
                    reporter.separator(&scenario.constants)?;
                }
                break StopReason::TickLimit;
            }
        };

        let summary = RunSummary {
            ticks,
            orbits: scenario.window.orbits_completed(),
            rows: reporter.rows(),
            stop,
        };
        info!(
            "finished after {} ticks, {} orbits, {} rows ({:?}) in {}",
            summary.ticks,
            summary.orbits,
            summary.rows,
            summary.stop,
            format_elapsed(started.elapsed())
        );
        Ok(summary)
    }
}

fn announce(scenario: &Scenario) {
    let p = &scenario.parameters;
    info!("precision: {} bits", p.precision.bits());
    info!("timeStep [sec]: {} ({})", p.dt, p.timestep_text);
    info!("{}", p.method);
    info!("view: {} timesteps", p.view);
    if p.number_of_orbits == 0 {
        info!("number of orbits: unbounded");
    } else {
        info!("number of orbits: {}", p.number_of_orbits);
    }
    info!("body: {}", scenario.constants.name);
    if p.parabola {
        info!("parabola fit enabled");
    }
}

fn progress(scenario: &Scenario, elapsed: Duration, anomaly: f64) {
    info!("{}", progress_line(scenario, elapsed, anomaly));
}

/// `elapsed` is wall-clock time since the run started, not CPU time
fn progress_line(scenario: &Scenario, elapsed: Duration, anomaly: f64) -> String {
    format!(
        "orbit {} wall {} [{} days]; {:.3} deg;",
        scenario.window.orbits_completed(),
        format_elapsed(elapsed),
        scenario.state.days(&scenario.constants),
        anomaly.to_degrees()
    )
}

/// hh:mm:ss.mmm, hours keep counting past 24
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let (secs, ms) = (millis / 1000, millis % 1000);
    let (mins, s) = (secs / 60, secs % 60);
    let (h, m) = (mins / 60, mins % 60);
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}
