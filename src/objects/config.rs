//! Config.rs
//!
//! Simulation parameters handed over by the scenario collaborator at
//! (re)start. Defaults follow SI units with the real gravitational constant.

use crate::objects::errors::SimError;

pub const GRAVITATIONAL_CONSTANT: f64 = 6.67408e-11; //m^3 kg^-1 s^-2
pub const DEFAULT_MIN_FRAGMENT_MASS: f64 = 1.0e28; //kg
pub const DEFAULT_BASE_STEP: f64 = 60.0 / 60.0; //60 simulated seconds per second at 60 fps
pub const DEFAULT_HISTORY_LEN: usize = 1000; //frames kept for rewinding

/// PhysicsMode enum
///
/// How a rendered frame advances simulated time.
/// - ParallelPrecise = `time_mult` sub-steps, velocity phase split across the worker pool
/// - SerialPrecise = `time_mult` sub-steps on the calling thread
/// - Fast = one sub-step of `base_step * time_mult`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PhysicsMode {
    ParallelPrecise,
    #[default]
    SerialPrecise,
    Fast,
}

/// Worker count used when the configuration leaves it at zero: one core is
/// left for the caller
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// SimConfig struct
///
/// - g = gravitational constant
/// - softening = added in quadrature to every separation, 0 disables it
/// - min_fragment_mass = a body splits only if each daughter would be heavier than this
/// - collisions / tidal_disruption = enable the merge and Roche passes
/// - base_step = seconds per sub-step
/// - time_mult = sub-steps per frame (or the fast-mode multiplier)
/// - workers = pool size for the parallel mode, 0 picks [`default_workers`]
/// - history_len = frames kept for rewinding, 0 disables recording
/// - seed = fixes the rng used for split rotations
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub g: f64,
    pub softening: f64,
    pub min_fragment_mass: f64,
    pub collisions: bool,
    pub tidal_disruption: bool,
    pub base_step: f64,
    pub time_mult: u32,
    pub workers: usize,
    pub mode: PhysicsMode,
    pub history_len: usize,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            g: GRAVITATIONAL_CONSTANT,
            softening: 0.0,
            min_fragment_mass: DEFAULT_MIN_FRAGMENT_MASS,
            collisions: true,
            tidal_disruption: true,
            base_step: DEFAULT_BASE_STEP,
            time_mult: 1,
            workers: 0,
            mode: PhysicsMode::default(),
            history_len: DEFAULT_HISTORY_LEN,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn with_g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = softening;
        self
    }

    pub fn with_min_fragment_mass(mut self, mass: f64) -> Self {
        self.min_fragment_mass = mass;
        self
    }

    pub fn with_collisions(mut self, enabled: bool) -> Self {
        self.collisions = enabled;
        self
    }

    pub fn with_tidal_disruption(mut self, enabled: bool) -> Self {
        self.tidal_disruption = enabled;
        self
    }

    pub fn with_base_step(mut self, seconds: f64) -> Self {
        self.base_step = seconds;
        self
    }

    pub fn with_time_mult(mut self, time_mult: u32) -> Self {
        self.time_mult = time_mult;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_mode(mut self, mode: PhysicsMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_history_len(mut self, frames: usize) -> Self {
        self.history_len = frames;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// pool size after resolving the automatic setting
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            default_workers()
        } else {
            self.workers
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.g.is_finite() && self.g >= 0.0) {
            return Err(invalid("g", format!("must be finite and non-negative, got {}", self.g)));
        }
        if !(self.softening.is_finite() && self.softening >= 0.0) {
            return Err(invalid(
                "softening",
                format!("must be finite and non-negative, got {}", self.softening),
            ));
        }
        if !(self.min_fragment_mass.is_finite() && self.min_fragment_mass >= 0.0) {
            return Err(invalid(
                "min_fragment_mass",
                format!("must be finite and non-negative, got {}", self.min_fragment_mass),
            ));
        }
        if !(self.base_step.is_finite() && self.base_step > 0.0) {
            return Err(invalid(
                "base_step",
                format!("must be finite and positive, got {}", self.base_step),
            ));
        }
        if self.time_mult == 0 {
            return Err(invalid("time_mult", "must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SimError {
    SimError::InvalidConfig { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, PhysicsMode::SerialPrecise);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn rejects_zero_time_mult() {
        let err = SimConfig::default().with_time_mult(0).validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { field: "time_mult", .. }));
    }

    #[test]
    fn rejects_negative_softening_and_step() {
        assert!(SimConfig::default().with_softening(-1.0).validate().is_err());
        assert!(SimConfig::default().with_base_step(0.0).validate().is_err());
        assert!(SimConfig::default().with_g(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn explicit_workers_win_over_default() {
        assert_eq!(SimConfig::default().with_workers(3).worker_count(), 3);
    }
}
