pub mod barycenter;
pub mod clocks;
pub mod config;
pub mod errors;
pub mod gamestate;
pub mod gravity;
pub mod history;
pub mod lineage;
pub mod mergers;
pub mod movables;
pub mod plugins;
pub mod simulation;
pub mod tidal;
pub mod traits;
pub mod workers;

pub use self::config::{PhysicsMode, SimConfig};
pub use self::errors::SimError;
pub use self::movables::{Body, BodyId, BodySpec, Tint};
pub use self::plugins::NBodyPlugin;
pub use self::simulation::{FrameReport, Simulation, TickReport};
