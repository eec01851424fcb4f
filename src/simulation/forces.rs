//! Acceleration models for the two-body engine
//!
//! The integrator only sees the [`Acceleration`] trait; the one model in use
//! is the inverse-square pull of the central mass.

use crate::arithmetic::real::Real;
use crate::arithmetic::vector::Vector2;

/// Acceleration felt by the body at `radius`, written into `out`
pub trait Acceleration {
    fn acceleration(&self, radius: &Vector2, out: &mut Vector2);

    fn acceleration_at(&self, radius: &Vector2) -> Vector2 {
        let mut out = radius.clone();
        self.acceleration(radius, &mut out);
        out
    }
}

/// Newtonian gravity of a fixed central mass
///
/// a = -(mu / |r|^3) * r
pub struct NewtonianGravity {
    mu_neg: Real, // -G*M
}

impl NewtonianGravity {
    pub fn new(mu: &Real) -> Self {
        Self { mu_neg: -mu }
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, radius: &Vector2, out: &mut Vector2) {
        // |r| = sqrt(x^2 + y^2)
        let mut r = radius.x.clone();
        r.sqr_mut();
        let mut y2 = radius.y.clone();
        y2.sqr_mut();
        r += &y2;
        r.sqrt_mut();

        // factor = -mu / |r|^3, one reciprocal instead of two divisions
        let mut factor = r.clone();
        factor *= &r;
        factor *= &r;
        factor.inv_mut();
        factor *= &self.mu_neg;

        out.clone_from(radius);
        *out *= &factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::real::{Elementary, Precision};

    #[test]
    fn points_at_the_sun_with_inverse_square_magnitude() {
        let c = Precision::default();
        let mu = c.int(4);
        let gravity = NewtonianGravity::new(&mu);

        let radius = Vector2::new(c.int(3), c.int(4));
        let a = gravity.acceleration_at(&radius);

        // |a| = mu / |r|^2 = 4 / 25
        let expected = c.int(4) / c.int(25);
        assert!((a.norm() - &expected).abs() < c.parse("1E-40").unwrap());
        // anti-parallel: a . r = -|a| |r|
        let dot = a.dot(&radius);
        assert!((dot + &expected * &c.int(5)).abs() < c.parse("1E-40").unwrap());
    }

    #[test]
    fn doubling_the_distance_quarters_the_pull() {
        let c = Precision::default();
        let gravity = NewtonianGravity::new(&c.parse("1.32712440018E+20").unwrap());
        let near = gravity.acceleration_at(&Vector2::new(c.int(0), c.parse("5E+10").unwrap()));
        let far = gravity.acceleration_at(&Vector2::new(c.int(0), c.parse("1E+11").unwrap()));
        let ratio = (near.norm() / far.norm()).to_f64();
        assert!((ratio - 4.0).abs() < 1e-30);
    }
}
