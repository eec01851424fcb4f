//! Numerical parameters for the simulation
//!
//! `Parameters` holds the validated runtime settings:
//! - arithmetic precision (the construction context for every `Real`),
//! - fixed step size, integration method,
//! - priming window length and orbit target,
//! - whether to fit a parabola to every window.

use crate::arithmetic::real::{Elementary, Precision, Real};
use crate::configuration::config::{
    ConfigError, RunConfig, DEFAULT_METHOD, DEFAULT_NUMBER_OF_ORBITS, DEFAULT_PRECISION, DEFAULT_TIMESTEP,
    DEFAULT_VIEW,
};
use crate::simulation::integrator::Method;

/// Priming window used when `view` is configured as 0
pub const VIEW_WHEN_ZERO: usize = 20; // timesteps

/// Smallest accepted step
pub const MIN_TIMESTEP: &str = "0.001"; // s

#[derive(Debug, Clone)]
pub struct Parameters {
    pub precision: Precision,  // bits of every Real in the run
    pub dt: Real,              // step size [s]
    pub timestep_text: String, // step as configured
    pub number_of_orbits: usize, // 0 = unbounded
    pub method: Method,        // stepping scheme
    pub view: usize,           // priming window [timesteps]
    pub parabola: bool,        // parabola fit per window
}

impl Parameters {
    /// Validate a run configuration, missing fields take the defaults
    pub fn from_config(run: &RunConfig) -> Result<Self, ConfigError> {
        let number_of_orbits = run.number_of_orbits.unwrap_or(DEFAULT_NUMBER_OF_ORBITS);
        if number_of_orbits < 0 {
            return Err(ConfigError::NegativeOrbits);
        }

        let method_number = run.method.unwrap_or(DEFAULT_METHOD);
        let method = Method::from_number(method_number).ok_or(ConfigError::InvalidMethod(method_number))?;

        let view = run.view.unwrap_or(DEFAULT_VIEW);
        if view < 0 {
            return Err(ConfigError::NegativeView);
        }
        let view = if view == 0 { VIEW_WHEN_ZERO } else { view as usize };

        let bits = run.precision.unwrap_or(DEFAULT_PRECISION);
        if bits < 32 {
            return Err(ConfigError::PrecisionTooLow(bits));
        }
        let precision = u32::try_from(bits)
            .map_err(|_| ConfigError::PrecisionTooLow(bits))
            .and_then(|b| {
                Precision::new(b).map_err(|source| ConfigError::Numeral { field: "precision", source })
            })?;

        let timestep_text = run
            .timestep
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| DEFAULT_TIMESTEP.to_string());
        let dt = precision
            .parse(&timestep_text)
            .map_err(|source| ConfigError::Numeral { field: "timestep", source })?;
        if !(dt > precision.zero()) {
            return Err(ConfigError::TimestepNotPositive);
        }
        let min = precision
            .parse(MIN_TIMESTEP)
            .map_err(|source| ConfigError::Numeral { field: "timestep", source })?;
        if dt.abs() < min {
            return Err(ConfigError::TimestepTooSmall);
        }

        Ok(Self {
            precision,
            dt,
            timestep_text,
            number_of_orbits: number_of_orbits as usize,
            method,
            view,
            parabola: run.parabola.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(f: impl FnOnce(&mut RunConfig)) -> Result<Parameters, ConfigError> {
        let mut cfg = RunConfig::default();
        f(&mut cfg);
        Parameters::from_config(&cfg)
    }

    #[test]
    fn defaults() {
        let p = run(|_| {}).unwrap();
        assert_eq!(p.precision.bits(), 160);
        assert!(p.dt.is_one());
        assert_eq!(p.number_of_orbits, 3);
        assert_eq!(p.method, Method::AveragedAcceleration);
        assert_eq!(p.view, 30);
        assert!(!p.parabola);
    }

    #[test]
    fn zero_view_falls_back() {
        assert_eq!(run(|c| c.view = Some(0)).unwrap().view, VIEW_WHEN_ZERO);
    }

    #[test]
    fn each_configuration_error() {
        assert!(matches!(run(|c| c.timestep = Some("0".into())), Err(ConfigError::TimestepNotPositive)));
        assert!(matches!(run(|c| c.timestep = Some("-5".into())), Err(ConfigError::TimestepNotPositive)));
        assert!(matches!(run(|c| c.timestep = Some("0.0005".into())), Err(ConfigError::TimestepTooSmall)));
        assert!(matches!(run(|c| c.timestep = Some("abc".into())), Err(ConfigError::Numeral { .. })));
        assert!(matches!(run(|c| c.number_of_orbits = Some(-1)), Err(ConfigError::NegativeOrbits)));
        assert!(matches!(run(|c| c.method = Some(4)), Err(ConfigError::InvalidMethod(4))));
        assert!(matches!(run(|c| c.method = Some(0)), Err(ConfigError::InvalidMethod(0))));
        assert!(matches!(run(|c| c.view = Some(-1)), Err(ConfigError::NegativeView)));
        assert!(matches!(run(|c| c.precision = Some(31)), Err(ConfigError::PrecisionTooLow(31))));
    }

    #[test]
    fn non_finite_timesteps_are_rejected() {
        use crate::configuration::config::Numeral;
        for text in ["nan", "NaN", "inf", "-inf", "infinity", "@nan@", "@inf@"] {
            assert!(
                matches!(run(|c| c.timestep = Some(text.into())), Err(ConfigError::Numeral { field: "timestep", .. })),
                "{text}"
            );
        }
        // YAML `.nan` and `.inf` arrive as floats
        for value in [f64::NAN, f64::INFINITY] {
            assert!(matches!(run(|c| c.timestep = Some(Numeral::Float(value))), Err(ConfigError::Numeral { .. })));
        }
    }

    #[test]
    fn timestep_keeps_full_precision() {
        let p = run(|c| {
            c.timestep = Some("0.1".into());
            c.precision = Some(256);
        })
        .unwrap();
        assert_eq!(p.dt.precision(), 256);
        assert_eq!(p.dt, Precision::new(256).unwrap().parse("0.1").unwrap());
        assert_eq!(p.timestep_text, "0.1");
    }
}
