//! Build a ready-to-run scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing, already overlaid with the command
//! line) and produces the runtime bundle consumed by the engine:
//! - validated numerical parameters (`Parameters`)
//! - physical constants at the run precision (`PhysicalConstants`)
//! - the body at perihelion, t = 0 (`OrbitalState`)
//! - the force model (`NewtonianGravity`)
//! - a fresh perihelion window (`PerihelionWindow`)

use crate::configuration::config::{ConfigError, ScenarioConfig};
use crate::simulation::constants::PhysicalConstants;
use crate::simulation::forces::NewtonianGravity;
use crate::simulation::params::Parameters;
use crate::simulation::states::OrbitalState;
use crate::simulation::window::PerihelionWindow;

/// Fully-initialized simulation run
///
/// Every `Real` in here carries `parameters.precision`; the precision is fixed
/// once in `build_scenario` and never changed afterwards.
pub struct Scenario {
    pub parameters: Parameters,
    pub constants: PhysicalConstants,
    pub state: OrbitalState,
    pub forces: NewtonianGravity,
    pub window: PerihelionWindow,
}

impl Scenario {
    pub fn build_scenario(cfg: &ScenarioConfig) -> Result<Self, ConfigError> {
        // Parameters first: they fix the precision of everything else
        let parameters = Parameters::from_config(&cfg.run)?;

        let constants = PhysicalConstants::derive(parameters.precision, &cfg.body)?;

        // Initial state: body at perihelion moving along +y
        let state = OrbitalState::at_perihelion(&constants);

        let forces = NewtonianGravity::new(&constants.mu);

        let window = PerihelionWindow::new(parameters.view, parameters.number_of_orbits);

        Ok(Self {
            parameters,
            constants,
            state,
            forces,
            window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::config::RunConfig;
    use crate::simulation::integrator::Method;
    use crate::simulation::window::WindowPhase;

    #[test]
    fn defaults_build_mercury_at_perihelion() {
        let s = Scenario::build_scenario(&ScenarioConfig::default()).unwrap();
        assert_eq!(s.parameters.precision.bits(), 160);
        assert_eq!(s.parameters.method, Method::AveragedAcceleration);
        assert_eq!(s.constants.name, "Mercury");
        assert_eq!(s.state.radius.x, s.constants.perihelion_distance);
        assert!(s.state.radius.y.is_zero());
        assert!(s.state.current_time.is_zero());
        assert_eq!(s.window.phase(), WindowPhase::Priming);
    }

    #[test]
    fn constants_follow_the_run_precision() {
        let cfg = ScenarioConfig {
            run: RunConfig { precision: Some(96), ..Default::default() },
            ..Default::default()
        };
        let s = Scenario::build_scenario(&cfg).unwrap();
        assert_eq!(s.constants.mu.precision(), 96);
        assert_eq!(s.state.velocity.y.precision(), 96);
        assert_eq!(s.parameters.dt.precision(), 96);
    }

    #[test]
    fn invalid_run_settings_are_rejected() {
        let cfg = ScenarioConfig {
            run: RunConfig { method: Some(7), ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(Scenario::build_scenario(&cfg), Err(ConfigError::InvalidMethod(7))));
    }
}
