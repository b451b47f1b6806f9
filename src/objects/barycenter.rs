//! Barycenter.rs
//!
//! Mass-weighted centroid of the population, refreshed once per tick.

use crate::objects::movables::Body;
use bevy::math::DVec2;
use log::warn;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Barycenter {
    position: DVec2,
}

impl Barycenter {
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Recompute from `bodies`. An empty or massless population keeps the
    /// previous value and returns false.
    pub fn update(&mut self, bodies: &[Body]) -> bool {
        let mut weighted = DVec2::ZERO;
        let mut mass = 0.0;
        for body in bodies {
            weighted += body.position * body.mass;
            mass += body.mass;
        }

        if !(mass > 0.0 && mass.is_finite()) {
            warn!(
                "barycenter kept at {:?}: {} bodies with total mass {}",
                self.position,
                bodies.len(),
                mass
            );
            return false;
        }

        self.position = weighted / mass;
        true
    }
}
