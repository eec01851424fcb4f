pub mod constants;
pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod window;
pub mod reporter;
pub mod scenario;
pub mod engine;
