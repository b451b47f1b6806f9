//! 2-D gravitational N-body simulation with merging on collision, tidal
//! (Roche) fragmentation and barycenter tracking. Rendering and input live
//! elsewhere; [`objects::NBodyPlugin`] hooks the simulation into a bevy app.

pub mod objects;

pub use objects::{
    Body, BodyId, BodySpec, FrameReport, NBodyPlugin, PhysicsMode, SimConfig, SimError,
    Simulation, Tint,
};
