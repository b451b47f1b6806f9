//! Workers.rs
//!
//! Fixed-size pool for the parallel velocity phase. The pool is built once
//! per simulation and reused every tick. Each worker owns a contiguous chunk
//! of bodies and writes only there, while reading the shared position
//! snapshot; the pool join is the barrier before any body moves.

use crate::objects::errors::SimError;
use crate::objects::gravity::{self, GravityParams};
use crate::objects::movables::Body;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

/// Split `0..len` into `workers` chunks of `len / workers` bodies plus a
/// remainder chunk of `len % workers`. With fewer bodies than workers a
/// single chunk covers everything.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let size = len / workers;
    let rem = len % workers;

    if size == 0 {
        return if len == 0 { Vec::new() } else { vec![0..len] };
    }

    let mut chunks: Vec<Range<usize>> = (0..workers).map(|k| k * size..(k + 1) * size).collect();
    if rem != 0 {
        chunks.push(len - rem..len);
    }
    chunks
}

pub struct ForcePool {
    pool: ThreadPool,
    workers: usize,
}

impl ForcePool {
    pub fn new(workers: usize) -> Result<Self, SimError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("nbody-force-{i}"))
            .build()
            .map_err(|e| SimError::WorkerPool(e.to_string()))?;

        Ok(ForcePool { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Parallel velocity phase. Returns the number of coincident pairs
    /// skipped, or [`SimError::WorkerPanicked`] if a worker died; chunks
    /// that finished before the panic keep their updated velocities.
    pub fn accelerate(
        &self,
        bodies: &mut [Body],
        params: &GravityParams,
        dt: f64,
    ) -> Result<usize, SimError> {
        let attractors = gravity::snapshot(bodies);
        self.run_chunks(bodies, |offset, chunk| {
            gravity::accelerate(chunk, offset, &attractors, params, dt)
        })
    }

    /// Hand each worker its own chunk of `bodies` along with the chunk's
    /// offset, and sum what the workers return.
    fn run_chunks<F>(&self, bodies: &mut [Body], work: F) -> Result<usize, SimError>
    where
        F: Fn(usize, &mut [Body]) -> usize + Sync,
    {
        let ranges = partition(bodies.len(), self.workers);

        let mut owners: Vec<(usize, &mut [Body])> = Vec::with_capacity(ranges.len());
        let mut rest = bodies;
        for range in &ranges {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            owners.push((range.start, head));
            rest = tail;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                owners
                    .into_par_iter()
                    .map(|(offset, chunk)| work(offset, chunk))
                    .sum::<usize>()
            })
        }));

        outcome.map_err(|_| SimError::WorkerPanicked)
    }
}

impl std::fmt::Debug for ForcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForcePool")
            .field("workers", &self.workers)
            .finish()
    }
}
