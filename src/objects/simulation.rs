//! Simulation.rs
//!
//! The stepping driver. One tick runs the velocity phase, the position
//! phase, the Roche check and the collision fixed point, then refreshes the
//! barycenter. A rendered frame is `time_mult` ticks of `base_step` in the
//! precise modes, or one tick of `base_step * time_mult` in fast mode.

use crate::objects::barycenter::Barycenter;
use crate::objects::clocks::SimClock;
use crate::objects::config::{PhysicsMode, SimConfig};
use crate::objects::errors::SimError;
use crate::objects::gravity::{self, GravityParams};
use crate::objects::history::{Frame, FrameHistory};
use crate::objects::lineage::{Merger, Remap, Split};
use crate::objects::mergers;
use crate::objects::movables::{Body, BodyId, BodySpec, IdAllocator};
use crate::objects::tidal::{self, SplitAngle};
use crate::objects::workers::ForcePool;
use bevy::math::DVec2;
use bevy::prelude::Resource;
use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// TickReport struct
///
/// What one sub-step did to the population
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub mergers: Vec<Merger>,
    pub splits: Vec<Split>,
    pub coincident_pairs: usize,
    pub worker_failed: bool,
}

/// FrameReport struct
///
/// Summary handed to the rendering side after every frame.
/// - ticks / dt = sub-steps run and the step each one used
/// - lineage = remap for every id consumed during the frame
/// - barycenter = value after the last tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub ticks: u32,
    pub dt: f64,
    pub mergers: Vec<Merger>,
    pub splits: Vec<Split>,
    pub lineage: Remap,
    pub coincident_pairs: usize,
    pub worker_failures: u32,
    pub barycenter: DVec2,
}

impl FrameReport {
    pub fn merged(&self) -> bool {
        !self.mergers.is_empty()
    }

    pub fn split(&self) -> bool {
        !self.splits.is_empty()
    }

    /// true if any body was created or destroyed during the frame
    pub fn restructured(&self) -> bool {
        self.merged() || self.split()
    }

    /// current id of whatever `id` referred to before the frame
    pub fn resolve(&self, id: BodyId) -> BodyId {
        self.lineage.resolve(id)
    }

    fn absorb(&mut self, tick: TickReport) {
        // splits run before merges inside a tick
        for split in &tick.splits {
            self.lineage.record_split(split);
        }
        for merger in &tick.mergers {
            self.lineage.record_merger(merger);
        }
        self.ticks += 1;
        self.splits.extend(tick.splits);
        self.mergers.extend(tick.mergers);
        self.coincident_pairs += tick.coincident_pairs;
        if tick.worker_failed {
            self.worker_failures += 1;
        }
    }
}

/// Simulation struct: Resource
///
/// Owns the population and everything needed to advance it
#[derive(Resource, Debug)]
pub struct Simulation {
    config: SimConfig,
    bodies: Vec<Body>,
    ids: IdAllocator,
    barycenter: Barycenter,
    clock: SimClock,
    time_mult: u32,
    mode: PhysicsMode,
    paused: bool,
    pool: ForcePool,
    history: FrameHistory,
    angles: SplitAngle,
    rng: StdRng,
}

impl Simulation {
    pub fn new(config: SimConfig, specs: &[BodySpec]) -> Result<Self, SimError> {
        config.validate()?;
        check_specs(specs)?;

        let pool = ForcePool::new(config.worker_count())?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut sim = Simulation {
            bodies: Vec::new(),
            ids: IdAllocator::new(),
            barycenter: Barycenter::default(),
            clock: SimClock::new(),
            time_mult: config.time_mult,
            mode: config.mode,
            paused: false,
            pool,
            history: FrameHistory::new(config.history_len),
            angles: SplitAngle::new()?,
            rng,
            config,
        };
        sim.populate(specs);

        info!(
            "simulation started with {} bodies, {:?} mode, {} workers",
            sim.bodies.len(),
            sim.mode,
            sim.pool.workers()
        );
        Ok(sim)
    }

    /// Replace the population with a fresh scenario. Ids keep counting up,
    /// so nothing held from before the reset can match a new body.
    pub fn reset(&mut self, specs: &[BodySpec]) -> Result<(), SimError> {
        check_specs(specs)?;

        self.time_mult = self.config.time_mult;
        self.mode = self.config.mode;
        self.paused = false;
        self.clock.reset();
        self.history.clear();
        self.barycenter = Barycenter::default();
        self.populate(specs);

        info!("simulation reset with {} bodies", self.bodies.len());
        Ok(())
    }

    fn populate(&mut self, specs: &[BodySpec]) {
        self.bodies = specs
            .iter()
            .map(|spec| Body::from_spec(self.ids.next_id(), spec))
            .collect();
        self.barycenter.update(&self.bodies);
        self.history.record(self.snapshot());
    }

    /// Add one body to the running population. The newest history frame is
    /// rewritten to include it, and frames ahead of a rewound position are
    /// dropped, so stepping through history never loses the body.
    pub fn add_body(&mut self, spec: &BodySpec) -> Result<BodyId, SimError> {
        spec.check(self.bodies.len())?;
        let body = Body::from_spec(self.ids.next_id(), spec);
        let id = body.id();
        self.bodies.push(body);
        self.barycenter.update(&self.bodies);

        self.history.truncate_future();
        self.history.amend(self.snapshot());
        debug!("added body {id}, {} bodies now", self.bodies.len());
        Ok(id)
    }

    fn gravity_params(&self) -> GravityParams {
        GravityParams {
            g: self.config.g,
            softening: self.config.softening,
        }
    }

    fn snapshot(&self) -> Frame {
        Frame {
            bodies: self.bodies.clone(),
            barycenter: self.barycenter,
            clock: self.clock,
        }
    }

    fn restore(&mut self, frame: Frame) {
        self.bodies = frame.bodies;
        self.barycenter = frame.barycenter;
        self.clock = frame.clock;
    }

    /// One sub-step of `dt` seconds
    pub fn tick(&mut self, dt: f64) -> TickReport {
        let params = self.gravity_params();
        let velocity = match self.mode {
            PhysicsMode::ParallelPrecise => self.pool.accelerate(&mut self.bodies, &params, dt),
            PhysicsMode::SerialPrecise | PhysicsMode::Fast => {
                Ok(gravity::accelerate_all(&mut self.bodies, &params, dt))
            }
        };
        self.finish_tick(velocity, dt)
    }

    /// Everything after the velocity phase. A failed velocity phase is
    /// logged and the tick goes on with whatever velocities were written.
    fn finish_tick(&mut self, velocity: Result<usize, SimError>, dt: f64) -> TickReport {
        let mut report = TickReport::default();
        match velocity {
            Ok(coincident) => report.coincident_pairs = coincident,
            Err(e) => {
                error!("{e}; tick {} continues with partial velocities", self.clock.ticks);
                report.worker_failed = true;
            }
        }
        if report.coincident_pairs > 0 {
            warn!(
                "{} coincident body pairs skipped in the velocity phase",
                report.coincident_pairs
            );
        }

        gravity::drift(&mut self.bodies, dt);

        if self.config.tidal_disruption {
            report.splits = tidal::resolve_disruptions(
                &mut self.bodies,
                &mut self.ids,
                self.config.min_fragment_mass,
                &self.angles,
                &mut self.rng,
            );
        }

        if self.config.collisions {
            report.mergers = mergers::resolve_collisions(&mut self.bodies, &mut self.ids);
        }

        self.barycenter.update(&self.bodies);
        self.clock.tick(dt);
        report
    }

    /// Advance one rendered frame according to the current mode. A paused
    /// simulation reports zero ticks and stays put.
    pub fn advance_frame(&mut self) -> FrameReport {
        let mut report = FrameReport {
            barycenter: self.barycenter.position(),
            ..Default::default()
        };
        if self.paused {
            return report;
        }

        let base = self.config.base_step;
        let (steps, dt) = match self.mode {
            PhysicsMode::Fast => (1, base * f64::from(self.time_mult)),
            PhysicsMode::ParallelPrecise | PhysicsMode::SerialPrecise => (self.time_mult, base),
        };
        report.dt = dt;

        for _ in 0..steps {
            let tick = self.tick(dt);
            report.absorb(tick);
        }

        self.clock.frame();
        self.history.record(self.snapshot());
        report.barycenter = self.barycenter.position();

        if report.restructured() {
            debug!(
                "frame {}: {} mergers, {} splits, {} bodies left",
                self.clock.frames,
                report.mergers.len(),
                report.splits.len(),
                self.bodies.len()
            );
        }
        report
    }

    /// Multiply `time_mult` by `factor`, never going below 1
    pub fn scale_time(&mut self, factor: f64) {
        let scaled = (f64::from(self.time_mult) * factor).floor();
        self.time_mult = if scaled.is_finite() && scaled >= 1.0 {
            scaled.min(f64::from(u32::MAX)) as u32
        } else {
            1
        };
    }

    pub fn faster(&mut self) {
        self.scale_time(2.0);
    }

    pub fn slower(&mut self) {
        self.scale_time(0.5);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume stepping. Frames ahead of a rewound position are discarded.
    pub fn resume(&mut self) {
        if self.paused {
            self.history.truncate_future();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Step back one recorded frame. Only works while paused.
    pub fn rewind(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        match self.history.rewind().cloned() {
            Some(frame) => {
                self.restore(frame);
                true
            }
            None => false,
        }
    }

    /// Step forward one recorded frame. Only works while paused.
    pub fn forward(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        match self.history.forward().cloned() {
            Some(frame) => {
                self.restore(frame);
                true
            }
            None => false,
        }
    }

    pub fn set_mode(&mut self, mode: PhysicsMode) {
        if mode != self.mode {
            info!("physics mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    pub fn set_softening(&mut self, softening: f64) -> Result<(), SimError> {
        let config = self.config.clone().with_softening(softening);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_min_fragment_mass(&mut self, mass: f64) -> Result<(), SimError> {
        let config = self.config.clone().with_min_fragment_mass(mass);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn toggle_collisions(&mut self) -> bool {
        self.config.collisions = !self.config.collisions;
        self.config.collisions
    }

    pub fn toggle_tidal_disruption(&mut self) -> bool {
        self.config.tidal_disruption = !self.config.tidal_disruption;
        self.config.tidal_disruption
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn barycenter(&self) -> DVec2 {
        self.barycenter.position()
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    pub fn time_mult(&self) -> u32 {
        self.time_mult
    }

    pub fn mode(&self) -> PhysicsMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }
}

fn check_specs(specs: &[BodySpec]) -> Result<(), SimError> {
    specs
        .iter()
        .enumerate()
        .try_for_each(|(index, spec)| spec.check(index))
}
