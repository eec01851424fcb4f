//! Orbit table output
//!
//! One `;`-separated table per perihelion window: a header row, one data row
//! per tick inside the window and a blank line when the window closes. Rows
//! are flushed as they are written so the stream can be followed live.
//!
//! With the parabola fit enabled, the radii of a window are collected and,
//! when it closes, the best factor `a` of `delta_x = a*y^2` is printed before
//! the blank line.

use std::io::{self, Write};

use crate::arithmetic::format::{FormatError, NumberFormat};
use crate::arithmetic::real::{atan2, Elementary, Precision, Real};
use crate::arithmetic::vector::Vector2;
use crate::simulation::constants::PhysicalConstants;
use crate::simulation::states::OrbitalState;

pub const HEADER: &str = "orbit;time_s;true_anomaly_deg;distance_m;delta_radius_x_m;radius_y_m;\
velocity_x_m/s;velocity_y_m/s;angle_velocity_deg;delta_abs_radius_m;duration_light_s";

const COLUMN_SEPARATOR: &str = "; ";

struct Formats {
    orbit: NumberFormat,
    time: NumberFormat,
    value: NumberFormat,
    light: NumberFormat,
    delta_x: NumberFormat,
    y: NumberFormat,
    factor: NumberFormat,
    mean: NumberFormat,
    sigma: NumberFormat,
}

impl Formats {
    fn new() -> Result<Self, FormatError> {
        Ok(Self {
            orbit: NumberFormat::parse("%5.0Rf; ")?,
            time: NumberFormat::parse("%.3Rf")?,
            value: NumberFormat::parse("%.20Rf")?,
            light: NumberFormat::parse("; %.1Rf")?,
            delta_x: NumberFormat::parse("%20.6RF; ")?,
            y: NumberFormat::parse("%20.6Rf; ")?,
            factor: NumberFormat::parse("%0.10RfE-12")?,
            mean: NumberFormat::parse("%15.10RfE-12  sigma(a): ")?,
            sigma: NumberFormat::parse("%15.10RfE-12")?,
        })
    }
}

/// Writes the orbit table to `out`
pub struct OrbitReporter<W: Write> {
    out: W,
    formats: Formats,
    parabola_points: Option<Vec<Vector2>>,
    rows: u64,
}

impl<W: Write> OrbitReporter<W> {
    pub fn new(out: W, parabola: bool) -> Result<Self, FormatError> {
        Ok(Self {
            out,
            formats: Formats::new()?,
            parabola_points: parabola.then(Vec::new),
            rows: 0,
        })
    }

    /// Data rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HEADER}")
    }

    pub fn row(&mut self, orbit: usize, state: &OrbitalState, constants: &PhysicalConstants) -> io::Result<()> {
        let line = self.format_row(orbit, state, constants);
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        self.rows += 1;

        if let Some(points) = self.parabola_points.as_mut() {
            points.push(state.radius.clone());
        }
        Ok(())
    }

    /// Close the current window
    pub fn separator(&mut self, constants: &PhysicalConstants) -> io::Result<()> {
        if let Some(points) = self.parabola_points.take() {
            self.parabola(&points, constants)?;
            self.parabola_points = Some(Vec::new());
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn format_row(&self, orbit: usize, state: &OrbitalState, constants: &PhysicalConstants) -> String {
        let f = &self.formats;
        let ctx = constants.precision;
        let dp = &constants.perihelion_distance;
        let radius = &state.radius;
        let velocity = &state.velocity;

        let abs_radius = radius.norm();
        let light = &abs_radius / &constants.velocity_of_light;
        let true_anomaly = atan2(&radius.y, &radius.x);
        let angle_of_velocity = atan2(&velocity.y, &velocity.x);
        let delta_x = &radius.x - dp;
        let distance = (radius.y.sqr() + delta_x.sqr()).sqrt();

        let columns = [
            f.time.render(&state.current_time),
            f.value.render(&(&true_anomaly * &constants.degrees)),
            f.value.render(&distance),
            f.value.render(&delta_x),
            f.value.render(&radius.y),
            f.value.render(&velocity.x),
            f.value.render(&velocity.y),
            f.value.render(&(&angle_of_velocity * &constants.degrees)),
            f.value.render(&(&abs_radius - dp)),
        ];

        format!(
            "{}{}{}",
            f.orbit.render(&ctx.size(orbit)),
            columns.join(COLUMN_SEPARATOR),
            f.light.render(&light)
        )
    }

    fn parabola(&mut self, points: &[Vector2], constants: &PhysicalConstants) -> io::Result<()> {
        let ctx = constants.precision;
        let scale = ctx.int(1_000_000_000_000);
        let dp = &constants.perihelion_distance;

        writeln!(self.out, "{} points (Delta radius x, radius y)", points.len())?;
        writeln!(self.out, "index; delta_radius_x_m; radius_y_m; parabola_factor_1/m;")?;

        let mut factors: Vec<Real> = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            let x = &p.x - dp;
            let y = &p.y;
            let line = if y.is_zero() {
                format!("{i:2}; {}{}-", self.formats.delta_x.render(&x), self.formats.y.render(y))
            } else {
                let a = &(&x / y) / y;
                let text = format!(
                    "{i:2}; {}{}{}",
                    self.formats.delta_x.render(&x),
                    self.formats.y.render(y),
                    self.formats.factor.render(&(&scale * &a))
                );
                factors.push(a);
                text
            };
            writeln!(self.out, "{line}")?;
        }

        if let Some((mean, sigma)) = mean_and_sigma(ctx, &factors) {
            writeln!(
                self.out,
                "Delta x = a*y*y;   mean(a): {}{}",
                self.formats.mean.render(&(&scale * &mean)),
                self.formats.sigma.render(&(&scale * &sigma))
            )?;
        }
        Ok(())
    }
}

/// Mean and sample standard deviation, `None` for fewer than two values
fn mean_and_sigma(ctx: Precision, values: &[Real]) -> Option<(Real, Real)> {
    if values.len() < 2 {
        return None;
    }
    let n = ctx.size(values.len());

    let mut sum = ctx.zero();
    let mut sum_sq = ctx.zero();
    for v in values {
        sum += v;
        sum_sq += v.sqr();
    }
    let mean = &sum / &n;
    let variance = (&sum_sq - &(&(&mean * &mean) * &n)) / (&n - &ctx.int(1));
    // rounding can push a zero variance slightly negative
    let sigma = if variance.is_sign_negative() { ctx.zero() } else { variance.sqrt() };
    Some((mean, sigma))
}
