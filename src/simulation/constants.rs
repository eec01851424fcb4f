//! Physical constants of a run
//!
//! Derived once from a [`BodyConfig`] at the run precision and read-only
//! afterwards. The body starts at perihelion, so the perihelion distance and
//! speed fix the initial state.

use crate::arithmetic::real::{Elementary, Precision, Real};
use crate::configuration::config::{BodyConfig, ConfigError, Numeral};

pub const PI: &str = "3.1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";

pub const JULIAN_DAY: i64 = 86400; // s

#[derive(Debug, Clone)]
pub struct PhysicalConstants {
    pub precision: Precision,
    pub name: String,
    pub pi: Real,
    pub degrees: Real,                // 180/pi
    pub mu: Real,                     // heliocentric gravitational parameter G*M
    pub mean_distance: Real,          // semi-major axis [m]
    pub eccentricity: Real,
    pub perihelion_distance: Real,    // (1-e)*a
    pub velocity_perihelion: Real,    // sqrt(((1+e)/(1-e)) * mu/a)
    pub velocity_aphelion: Real,      // sqrt(((1-e)/(1+e)) * mu/a)
    pub velocity_of_light: Real,
    pub julian_day: Real,
}

fn numeral(ctx: Precision, field: &'static str, value: &Numeral) -> Result<Real, ConfigError> {
    ctx.parse(&value.to_string())
        .map_err(|source| ConfigError::Numeral { field, source })
}

impl PhysicalConstants {
    pub fn derive(ctx: Precision, body: &BodyConfig) -> Result<Self, ConfigError> {
        let zero = ctx.zero();
        let one = ctx.int(1);

        let pi = ctx.parse(PI).map_err(|source| ConfigError::Numeral { field: "pi", source })?;
        let degrees = ctx.int(180) / &pi;

        let mu = numeral(ctx, "heliocentric_gravitational_constant", &body.heliocentric_gravitational_constant)?;
        let au = numeral(ctx, "astronomical_unit", &body.astronomical_unit)?;
        let mean_distance_au = numeral(ctx, "mean_distance_au", &body.mean_distance_au)?;
        let eccentricity = numeral(ctx, "orbital_eccentricity", &body.orbital_eccentricity)?;
        let velocity_of_light = numeral(ctx, "velocity_of_light", &body.velocity_of_light)?;

        if !(mu > zero) {
            return Err(ConfigError::NotPositive("heliocentric_gravitational_constant"));
        }
        if !(au > zero) {
            return Err(ConfigError::NotPositive("astronomical_unit"));
        }
        if !(mean_distance_au > zero) {
            return Err(ConfigError::NotPositive("mean_distance_au"));
        }
        if !(velocity_of_light > zero) {
            return Err(ConfigError::NotPositive("velocity_of_light"));
        }
        if !(eccentricity >= zero && eccentricity < one) {
            return Err(ConfigError::Eccentricity);
        }

        let mean_distance = &mean_distance_au * &au;
        let one_plus_e = &one + &eccentricity;
        let one_minus_e = &one - &eccentricity;

        let velocity_perihelion = (&(&one_plus_e / &one_minus_e) * &mu / &mean_distance).sqrt();
        let velocity_aphelion = (&(&one_minus_e / &one_plus_e) * &mu / &mean_distance).sqrt();
        let perihelion_distance = &one_minus_e * &mean_distance;

        Ok(Self {
            precision: ctx,
            name: body.name.clone(),
            pi,
            degrees,
            mu,
            mean_distance,
            eccentricity,
            perihelion_distance,
            velocity_perihelion,
            velocity_aphelion,
            velocity_of_light,
            julian_day: ctx.int(JULIAN_DAY),
        })
    }

    /// Orbital period from Kepler's third law, 2*pi*sqrt(a^3/mu)
    pub fn period(&self) -> Real {
        let mut a3 = self.mean_distance.clone();
        a3.cube_mut();
        &(&self.pi * &self.precision.int(2)) * &(&a3 / &self.mu).sqrt()
    }
}
