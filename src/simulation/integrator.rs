//! Fixed-step time integrators for the two-body system
//!
//! Three schemes, chosen per run:
//! - [`Method::Euler`]: first order, old velocity moves the body
//! - [`Method::Taylor`]: adds the a*dt^2/2 term to the position update
//! - [`Method::AveragedAcceleration`]: predictor-corrector, the Taylor update
//!   driven by the mean of the accelerations at the start and at a trial end
//!   point
//!
//! All of them are driven by an [`Acceleration`] model and advance
//! `OrbitalState` in place by `params.dt`.

use std::fmt;

use crate::arithmetic::real::Real;
use crate::arithmetic::vector::Vector2;
use crate::simulation::forces::Acceleration;
use crate::simulation::params::Parameters;
use crate::simulation::states::OrbitalState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Euler = 1,
    Taylor = 2,
    AveragedAcceleration = 3,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Euler, Method::Taylor, Method::AveragedAcceleration];

    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Method::Euler),
            2 => Some(Method::Taylor),
            3 => Some(Method::AveragedAcceleration),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Method::Euler => "steps with linear simulation",
            Method::Taylor => "steps with quadratic simulation",
            Method::AveragedAcceleration => "steps with quadratic simulation and average of accelerations",
        };
        write!(f, "method {}: {}", self.number(), text)
    }
}

/// Increments applied to the state by one step
#[derive(Debug, Clone, PartialEq)]
pub struct Changes {
    pub radius: Vector2,
    pub velocity: Vector2,
}

/// One step's acceleration and the increments it produces
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub acceleration: Vector2,
    pub changes: Changes,
}

/// dv = a*dt, dr = (v + dv/2)*dt = v*dt + a*dt^2/2
pub fn changes(acceleration: &Vector2, dt: &Real, velocity: &Vector2) -> Changes {
    // unit step needs no scaling
    let unit = dt.is_one();

    let mut dv = acceleration.clone();
    if !unit {
        dv *= dt;
    }

    let mut dr = dv.clone();
    dr.halve_mut();
    dr += velocity;
    if !unit {
        dr *= dt;
    }

    Changes { radius: dr, velocity: dv }
}

/// Method 1: dv = a*dt, dr = v*dt with the old velocity
pub fn euler_step<F: Acceleration>(forces: &F, radius: &Vector2, velocity: &Vector2, dt: &Real) -> Step {
    let acceleration = forces.acceleration_at(radius);

    let mut dv = acceleration.clone();
    dv *= dt;
    let mut dr = velocity.clone();
    dr *= dt;

    Step { acceleration, changes: Changes { radius: dr, velocity: dv } }
}

/// Method 2: second order in position
pub fn taylor_step<F: Acceleration>(forces: &F, radius: &Vector2, velocity: &Vector2, dt: &Real) -> Step {
    let acceleration = forces.acceleration_at(radius);
    let changes = changes(&acceleration, dt, velocity);
    Step { acceleration, changes }
}

/// The two force evaluations of method 3 and their mean
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedAcceleration {
    pub start: Vector2, // a(r)
    pub trial: Vector2, // a(r + dr), dr from the Taylor update
    pub mean: Vector2,  // (start + trial)/2
}

/// Predictor of method 3
pub fn averaged_acceleration<F: Acceleration>(
    forces: &F,
    radius: &Vector2,
    velocity: &Vector2,
    dt: &Real,
) -> AveragedAcceleration {
    let start = forces.acceleration_at(radius);
    let predicted = changes(&start, dt, velocity);

    let mut radius_try = radius.clone();
    radius_try += &predicted.radius;
    let trial = forces.acceleration_at(&radius_try);

    let mut mean = start.clone();
    mean += &trial;
    mean.halve_mut();

    AveragedAcceleration { start, trial, mean }
}

/// Method 3: Taylor update with the averaged acceleration
pub fn averaged_step<F: Acceleration>(forces: &F, radius: &Vector2, velocity: &Vector2, dt: &Real) -> Step {
    let acceleration = averaged_acceleration(forces, radius, velocity, dt).mean;
    let changes = changes(&acceleration, dt, velocity);
    Step { acceleration, changes }
}

pub fn compute_step<F: Acceleration>(
    method: Method,
    forces: &F,
    radius: &Vector2,
    velocity: &Vector2,
    dt: &Real,
) -> Step {
    match method {
        Method::Euler => euler_step(forces, radius, velocity, dt),
        Method::Taylor => taylor_step(forces, radius, velocity, dt),
        Method::AveragedAcceleration => averaged_step(forces, radius, velocity, dt),
    }
}

/// Advance the state by one step of `params.dt` with `params.method`
/// Updates radius, velocity, the acceleration used and `current_time` in place
pub fn integrate_step<F: Acceleration>(state: &mut OrbitalState, forces: &F, params: &Parameters) {
    let dt = &params.dt;
    let Step { acceleration, changes } = compute_step(params.method, forces, &state.radius, &state.velocity, dt);

    state.radius += &changes.radius;
    state.velocity += &changes.velocity;
    state.acceleration = acceleration;
    state.current_time += dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::real::Precision;
    use crate::simulation::forces::NewtonianGravity;

    fn v(c: Precision, x: i64, y: i64) -> Vector2 {
        Vector2::new(c.int(x), c.int(y))
    }

    #[test]
    fn changes_expands_to_taylor_terms() {
        let c = Precision::default();
        let a = v(c, 2, -4);
        let vel = v(c, 10, 20);
        let dt = c.int(3);

        let ch = changes(&a, &dt, &vel);
        // dv = a*dt
        assert_eq!(ch.velocity, v(c, 6, -12));
        // dr = v*dt + a*dt^2/2 = (30, 60) + (9, -18)
        assert_eq!(ch.radius, v(c, 39, 42));
    }

    #[test]
    fn unit_step_shortcut_matches_general_branch() {
        let c = Precision::default();
        let a = Vector2::new(c.parse("-0.0391").unwrap(), c.parse("0.0017").unwrap());
        let vel = Vector2::new(c.parse("12.5").unwrap(), c.parse("58980.3").unwrap());

        let unit = changes(&a, &c.int(1), &vel);

        let mut dv = a.clone();
        dv *= &c.int(1);
        let mut dr = dv.clone();
        dr.halve_mut();
        dr += &vel;
        dr *= &c.int(1);
        assert_eq!(unit, Changes { radius: dr, velocity: dv });
    }

    #[test]
    fn method_numbers_round_trip() {
        for m in Method::ALL {
            assert_eq!(Method::from_number(m.number() as i64), Some(m));
        }
        assert_eq!(Method::from_number(4), None);
    }

    #[test]
    fn euler_moves_with_old_velocity() {
        let c = Precision::default();
        // |r|^3 = 64, so the factor -640/64 is exact
        let gravity = NewtonianGravity::new(&c.int(640));
        let r = v(c, 4, 0);
        let vel = v(c, 0, 7);
        let dt = c.int(2);

        let step = euler_step(&gravity, &r, &vel, &dt);
        assert_eq!(step.changes.radius, v(c, 0, 14));
        assert_eq!(step.acceleration, v(c, -40, 0));
        assert_eq!(step.changes.velocity, v(c, -80, 0));
    }

    #[test]
    fn integrate_step_advances_time_and_state() {
        let c = Precision::default();
        let gravity = NewtonianGravity::new(&c.int(640));
        let mut params = crate::simulation::params::Parameters::from_config(&Default::default()).unwrap();
        params.method = Method::Taylor;
        params.dt = c.int(2);

        let mut state = OrbitalState {
            radius: v(c, 4, 0),
            velocity: v(c, 0, 7),
            acceleration: Vector2::zeros(c),
            current_time: c.int(5),
        };
        integrate_step(&mut state, &gravity, &params);

        // dv = (-80,0), dr = ((0,7) + dv/2)*2
        assert_eq!(state.radius, v(c, -76, 14));
        assert_eq!(state.velocity, v(c, -80, 7));
        assert_eq!(state.acceleration, v(c, -40, 0));
        assert_eq!(state.current_time, c.int(7));
    }
}
