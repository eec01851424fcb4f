//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario file has two optional sections:
//!
//! - [`RunConfig`]  – numerical settings of a run (step, method, window, precision)
//! - [`BodyConfig`] – astronomical inputs for the orbiting body and its sun
//!
//! Anything left out falls back to the built-in defaults (Mercury around the
//! Sun, one second steps, the averaged-acceleration method, 160 bits). Command
//! line flags are overlaid on top with [`RunConfig::overlay`].
//!
//! # YAML format
//!
//! ```yaml
//! run:
//!   timestep: "60"          # seconds, decimal numeral (quoted or not)
//!   number_of_orbits: 10    # 0 -> run until interrupted
//!   method: 3               # 1 Euler, 2 Taylor, 3 averaged acceleration
//!   view: 30                # priming window in timesteps, 0 -> 20
//!   precision: 160          # bits of significand
//!   parabola: false         # print a parabola fit for every window
//!
//! body:
//!   name: Mercury
//!   mean_distance_au: "0.38709893"
//!   orbital_eccentricity: "0.20563593"
//!   heliocentric_gravitational_constant: "1.32712440018E+20"   # m^3 s^-2
//!   astronomical_unit: "149597870700"                          # m
//!   velocity_of_light: "299792458"                             # m/s
//! ```
//!
//! Decimal inputs are kept as text until the run precision is known, so they
//! are never rounded through `f64`.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::arithmetic::real::RealError;

pub const DEFAULT_TIMESTEP: &str = "1"; // s
pub const DEFAULT_NUMBER_OF_ORBITS: i64 = 3;
pub const DEFAULT_METHOD: i64 = 3;
pub const DEFAULT_VIEW: i64 = 30; // timesteps
pub const DEFAULT_PRECISION: i64 = 160; // bits

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("timestep must be greater than 0 seconds")]
    TimestepNotPositive,

    #[error("timestep must be at least 1 msec")]
    TimestepTooSmall,

    #[error("number of orbits must be greater or equal 0")]
    NegativeOrbits,

    #[error("method must be 1, 2, or 3 (got {0})")]
    InvalidMethod(i64),

    #[error("view must be greater or equal 0 timesteps")]
    NegativeView,

    #[error("precision must be greater than 31 bits (got {0})")]
    PrecisionTooLow(i64),

    #[error("orbital eccentricity must lie in [0, 1)")]
    Eccentricity,

    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),

    #[error("invalid value for {field}: {source}")]
    Numeral {
        field: &'static str,
        #[source]
        source: RealError,
    },

    #[error("cannot read scenario {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse scenario {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A decimal input written either as a YAML string or a YAML number
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Numeral {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeral::Text(s) => f.write_str(s),
            Numeral::Integer(i) => write!(f, "{i}"),
            // shortest representation that reads back to the same f64
            Numeral::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<&str> for Numeral {
    fn from(s: &str) -> Self {
        Numeral::Text(s.to_string())
    }
}

/// Numerical settings of a run; `None` means "use the default"
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub timestep: Option<Numeral>,      // seconds
    pub number_of_orbits: Option<i64>,  // 0 = unbounded
    pub method: Option<i64>,            // 1, 2 or 3
    pub view: Option<i64>,              // priming window in timesteps
    pub precision: Option<i64>,         // bits
    pub parabola: Option<bool>,         // parabola fit per window
}

impl RunConfig {
    /// Fields set in `other` replace the ones in `self`
    pub fn overlay(self, other: RunConfig) -> RunConfig {
        RunConfig {
            timestep: other.timestep.or(self.timestep),
            number_of_orbits: other.number_of_orbits.or(self.number_of_orbits),
            method: other.method.or(self.method),
            view: other.view.or(self.view),
            precision: other.precision.or(self.precision),
            parabola: other.parabola.or(self.parabola),
        }
    }
}

/// Astronomical inputs; defaults describe Mercury and the Sun
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BodyConfig {
    pub name: String,
    pub mean_distance_au: Numeral,                     // AU
    pub orbital_eccentricity: Numeral,
    pub heliocentric_gravitational_constant: Numeral,  // m^3 s^-2, G*M_sun
    pub astronomical_unit: Numeral,                    // m
    pub velocity_of_light: Numeral,                    // m/s
}

impl Default for BodyConfig {
    fn default() -> Self {
        // https://ssd.jpl.nasa.gov/?constants
        // https://solarsystem.nasa.gov/planets/mercury/by-the-numbers/
        Self {
            name: "Mercury".to_string(),
            mean_distance_au: "0.38709893".into(),
            orbital_eccentricity: "0.20563593".into(),
            heliocentric_gravitational_constant: "1.32712440018E+20".into(),
            astronomical_unit: "149597870700".into(),
            velocity_of_light: "299792458".into(),
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub body: BodyConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

/// Read a scenario file
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
