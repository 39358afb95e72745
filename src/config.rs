//! Ambient defaults for the solver pipeline, in the same spirit as the
//! teacher crate's `config::constant` module — bare constants for the
//! values that rarely change, plus small config structs for the knobs
//! callers of the public `solve`/`alns::run` entry points actually want to
//! override.

pub mod constant {
    /// Earth radius in meters used by the haversine distance.
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

    /// Default bound on improver passes (2-opt / 3-opt) when the caller
    /// does not specify one.
    pub const DEFAULT_IMPROVER_MAX_ITERATIONS: usize = 1000;

    /// Default ALNS iteration budget.
    pub const ALNS_DEFAULT_MAX_ITERATIONS: usize = 1000;

    /// Default number of stations removed per ALNS destroy step.
    pub const ALNS_DEFAULT_REMOVAL_SIZE: usize = 5;

    /// Initial temperature is this fraction of the starting tour distance.
    pub const ALNS_INITIAL_TEMPERATURE_FACTOR: f64 = 0.1;

    /// Geometric cooling rate applied to the SA temperature each iteration.
    pub const ALNS_COOLING_RATE: f64 = 0.995;

    /// Temperature floor; cooling never drives it lower.
    pub const ALNS_MIN_TEMPERATURE: f64 = 0.01;

    /// Acceptance scores awarded to the destroy operator that produced the
    /// accepted move, per spec section 4.6.
    pub const ALNS_SCORE_NEW_BEST: f64 = 15.0;
    pub const ALNS_SCORE_BETTER_THAN_CURRENT: f64 = 10.0;
    pub const ALNS_SCORE_SA_ACCEPT: f64 = 5.0;
    pub const ALNS_SCORE_REJECTED: f64 = 0.0;

    /// Station capacity / target ranges used by the synthetic generators.
    pub const GEN_CAPACITY_MIN: i64 = 15;
    pub const GEN_CAPACITY_MAX: i64 = 30;
    pub const GEN_TARGET_MARGIN: i64 = 5;

    /// Nominal depot coordinates shared by every generator, matching the
    /// original instance's fixed "Dépôt" location.
    pub const DEPOT_LONGITUDE: f64 = -1.5536;
    pub const DEPOT_LATITUDE: f64 = 47.2173;
}

/// Caller-overridable ALNS parameters (spec section 4.6).
#[derive(Debug, Clone, Copy)]
pub struct AlnsConfig {
    pub max_iterations: usize,
    pub removal_size: usize,
    pub seed: u64,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            max_iterations: constant::ALNS_DEFAULT_MAX_ITERATIONS,
            removal_size: constant::ALNS_DEFAULT_REMOVAL_SIZE,
            seed: 0,
        }
    }
}
