pub mod arithmetic;
pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use arithmetic::real::{Precision, Real, RealError, Elementary};
pub use arithmetic::format::{NumberFormat, Rendered, FormatError};
pub use arithmetic::vector::Vector2;

pub use simulation::states::{OrbitalState, NVec2};
pub use simulation::constants::PhysicalConstants;
pub use simulation::params::Parameters;
pub use simulation::forces::{Acceleration, NewtonianGravity};
pub use simulation::integrator::{Method, integrate_step};
pub use simulation::window::{PerihelionWindow, WindowTick, WindowPhase};
pub use simulation::reporter::OrbitReporter;
pub use simulation::scenario::Scenario;
pub use simulation::engine::{Engine, RunSummary, StopReason};

pub use configuration::config::{RunConfig, BodyConfig, ScenarioConfig, ConfigError, Numeral, load_scenario};

pub use benchmark::benchmark::{bench_methods, BENCH_PRECISIONS};

pub use error::Error;
