//! Errors.rs
//!
//! Error type for the simulation. Arithmetic degeneracies (coincident
//! bodies, a massless population) are guarded where they happen and never
//! surface here; these variants cover bad input and the worker pool.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    InvalidConfig { field: &'static str, reason: String },
    InvalidBody { index: usize, reason: String },
    WorkerPool(String),
    WorkerPanicked,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for `{field}`: {reason}")
            }
            SimError::InvalidBody { index, reason } => {
                write!(f, "invalid body at index {index}: {reason}")
            }
            SimError::WorkerPool(reason) => write!(f, "could not build worker pool: {reason}"),
            SimError::WorkerPanicked => write!(f, "a force worker panicked during the velocity phase"),
        }
    }
}

impl Error for SimError {}
