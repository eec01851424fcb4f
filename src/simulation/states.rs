//! Core state types for the two-body simulation.
//!
//! `OrbitalState` is the planet relative to the central mass, advanced once per
//! tick by the integrator. `NVec2` is the lossy `f64` projection used for
//! diagnostics.

use crate::arithmetic::real::{atan2, Precision, Real};
use crate::arithmetic::vector::Vector2;
use crate::simulation::constants::PhysicalConstants;

pub use crate::arithmetic::vector::NVec2;

#[derive(Debug, Clone)]
pub struct OrbitalState {
    pub radius: Vector2,       // position relative to the sun [m]
    pub velocity: Vector2,     // [m/s]
    pub acceleration: Vector2, // acceleration used by the last step [m/s^2]
    pub current_time: Real,    // [s]
}

impl OrbitalState {
    /// Body at perihelion on the +x axis, moving along +y
    pub fn at_perihelion(constants: &PhysicalConstants) -> Self {
        let ctx: Precision = constants.precision;
        Self {
            radius: Vector2::new(constants.perihelion_distance.clone(), ctx.zero()),
            velocity: Vector2::new(ctx.zero(), constants.velocity_perihelion.clone()),
            acceleration: Vector2::zeros(ctx),
            current_time: ctx.zero(),
        }
    }

    /// Angle of the radius from the +x axis [rad]
    pub fn true_anomaly(&self) -> Real {
        atan2(&self.radius.y, &self.radius.x)
    }

    /// Same angle computed in `f64`, good enough to classify ticks
    pub fn true_anomaly_f64(&self) -> f64 {
        let r: NVec2 = self.radius.to_f64();
        r.y.atan2(r.x)
    }

    /// Angle of the velocity from the +x axis [rad]
    pub fn velocity_angle(&self) -> Real {
        atan2(&self.velocity.y, &self.velocity.x)
    }

    /// Whole days elapsed
    pub fn days(&self, constants: &PhysicalConstants) -> u64 {
        (self.current_time.to_f64() / constants.julian_day.to_f64()).floor().max(0.0) as u64
    }

    /// Specific orbital energy v^2/2 - mu/|r|
    pub fn specific_energy(&self, constants: &PhysicalConstants) -> Real {
        let ctx = constants.precision;
        &self.velocity.sqr() / &ctx.int(2) - &constants.mu / &self.radius.norm()
    }
}
