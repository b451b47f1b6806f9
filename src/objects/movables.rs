//! Movables.rs
//!
//! The movables module defines the simulated body: its physical state, the
//! stable id used to track it across merges and splits, and the tint that
//! is blended or copied when the population changes shape.

use crate::objects::errors::SimError;
use crate::objects::traits::collisions::{CollisionDetection, Shapes};
use bevy::math::DVec2;
use std::f64::consts::PI;
use std::fmt;

/// Volume of a uniform sphere of the given radius
pub fn volume(radius: f64) -> f64 {
    (4.0 / 3.0) * PI * radius.powi(3)
}

/// Inverse of [`volume`]: the radius of a sphere holding `volume`
pub fn radius_for_volume(volume: f64) -> f64 {
    ((3.0 / 4.0) * volume / PI).cbrt()
}

/// BodyId struct
///
/// Stable handle for a body. Ids are handed out by an [`IdAllocator`] and
/// never reused, so a body created by a merge or a split always gets a
/// fresh id and old ids can be remapped by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// IdAllocator struct
///
/// Monotonic id source owned by a population
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator { next: 0 }
    }

    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next);
        self.next += 1;
        id
    }

    /// number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Tint enum
///
/// Display attribute propagated through merges. A black hole is its own
/// variant instead of a reserved color so that it can dominate any blend.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tint {
    Normal { r: u8, g: u8, b: u8 },
    BlackHole,
}

impl Tint {
    pub const WHITE: Tint = Tint::Normal {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Tint::Normal { r, g, b }
    }

    pub fn is_black_hole(&self) -> bool {
        matches!(self, Tint::BlackHole)
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

/// BodySpec struct
///
/// One entry of the initial population handed over by a scenario. The
/// simulation assigns the id when it turns a spec into a [`Body`].
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub mass: f64,   //kg
    pub radius: f64, //m
    pub position: DVec2,
    pub velocity: DVec2,
    pub name: Option<String>,
    pub tint: Option<Tint>,
}

impl BodySpec {
    pub fn new(mass: f64, radius: f64, sx: f64, sy: f64, vx: f64, vy: f64) -> Self {
        BodySpec {
            mass,
            radius,
            position: DVec2::new(sx, sy),
            velocity: DVec2::new(vx, vy),
            name: None,
            tint: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn tinted(mut self, tint: Tint) -> Self {
        self.tint = Some(tint);
        self
    }

    pub(crate) fn check(&self, index: usize) -> Result<(), SimError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimError::InvalidBody {
                index,
                reason: format!("mass must be positive and finite, got {}", self.mass),
            });
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SimError::InvalidBody {
                index,
                reason: format!("radius must be positive and finite, got {}", self.radius),
            });
        }
        if !(self.position.is_finite() && self.velocity.is_finite()) {
            return Err(SimError::InvalidBody {
                index,
                reason: "position and velocity must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Body struct
///
/// Physical state of one body.
/// - acceleration = diagnostic only, it keeps the contribution of the last
///   pair evaluated in the velocity phase and not the net acceleration
/// - lineage = id of the body whose trail this body continues; merges keep
///   the lineage of the heavier parent
/// - pending_disruption = set by the Roche check and consumed in the same tick
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: BodyId,
    pub name: Option<String>,
    pub tint: Tint,
    pub mass: f64,   //kg
    pub radius: f64, //m
    pub position: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
    pub lineage: BodyId,
    pub(crate) pending_disruption: bool,
}

impl Body {
    pub fn new(id: BodyId) -> Self {
        Body {
            id,
            lineage: id,
            ..Default::default()
        }
    }

    pub fn from_spec(id: BodyId, spec: &BodySpec) -> Self {
        Body::new(id)
            .set_size(spec.mass, spec.radius)
            .set_position(spec.position.x, spec.position.y)
            .set_velocity(spec.velocity.x, spec.velocity.y)
            .set_tint(spec.tint.unwrap_or_default())
            .set_name(spec.name.clone())
            .build()
    }

    pub fn set_position(&mut self, x: f64, y: f64) -> &mut Self {
        self.position = DVec2::new(x, y);
        self
    }

    pub fn set_velocity(&mut self, vx: f64, vy: f64) -> &mut Self {
        self.velocity = DVec2::new(vx, vy);
        self
    }

    pub fn set_size(&mut self, mass: f64, radius: f64) -> &mut Self {
        self.mass = mass;
        self.radius = radius;
        self
    }

    pub fn set_tint(&mut self, tint: Tint) -> &mut Self {
        self.tint = tint;
        self
    }

    pub fn set_name(&mut self, name: Option<String>) -> &mut Self {
        self.name = name;
        self
    }

    pub fn set_lineage(&mut self, lineage: BodyId) -> &mut Self {
        self.lineage = lineage;
        self
    }

    //for method build chaining
    pub fn build(&self) -> Body {
        self.clone()
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn volume(&self) -> f64 {
        volume(self.radius)
    }

    pub fn momentum(&self) -> DVec2 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn is_pending_disruption(&self) -> bool {
        self.pending_disruption
    }
}

impl Default for Body {
    fn default() -> Self {
        Body {
            id: BodyId(0),
            name: None,
            tint: Tint::default(),
            mass: 0.0,
            radius: 0.0,
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            lineage: BodyId(0),
            pending_disruption: false,
        }
    }
}

impl CollisionDetection for Body {
    fn get_position(&self) -> DVec2 {
        self.position
    }

    fn get_hitbox(&self) -> Shapes {
        Shapes::Circle(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_round_trips_through_radius() {
        let r = 6.9634e8;
        let back = radius_for_volume(volume(r));
        assert!((back - r).abs() / r < 1e-12);
    }

    #[test]
    fn builder_chain_sets_state() {
        let body = Body::new(BodyId(7))
            .set_size(5.0, 2.0)
            .set_position(1.0, -1.0)
            .set_velocity(3.0, 4.0)
            .build();

        assert_eq!(body.id(), BodyId(7));
        assert_eq!(body.lineage, BodyId(7));
        assert_eq!(body.position, DVec2::new(1.0, -1.0));
        assert!((body.kinetic_energy() - 62.5).abs() < 1e-12);
        assert_eq!(body.momentum(), DVec2::new(15.0, 20.0));
    }

    #[test]
    fn spec_without_tint_defaults_to_white() {
        let spec = BodySpec::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0).named("probe");
        let body = Body::from_spec(BodyId(3), &spec);
        assert_eq!(body.tint, Tint::WHITE);
        assert_eq!(body.name.as_deref(), Some("probe"));
    }

    #[test]
    fn spec_check_rejects_bad_mass_and_radius() {
        assert!(BodySpec::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0).check(0).is_err());
        assert!(BodySpec::new(1.0, -2.0, 0.0, 0.0, 0.0, 0.0).check(1).is_err());
        assert!(
            BodySpec::new(1.0, 1.0, f64::NAN, 0.0, 0.0, 0.0)
                .check(2)
                .is_err()
        );
        assert!(BodySpec::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0).check(3).is_ok());
    }

    #[test]
    fn allocator_never_reuses_ids() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(ids.issued(), 2);
    }
}
