//! Tidal.rs
//!
//! Tidal disruption. A body that gets closer to a neighbor than its Roche
//! limit is flagged, and once the whole population has been checked every
//! flagged body heavy enough to fragment is replaced by four daughters.

use crate::objects::errors::SimError;
use crate::objects::lineage::Split;
use crate::objects::movables::{Body, IdAllocator, radius_for_volume};
use crate::objects::traits::collisions::CollisionDetection;
use bevy::math::DVec2;
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::f64::consts::FRAC_PI_2;

pub const ROCHE_COEFFICIENT: f64 = 2.44; //rigid body approximation

/// daughter offsets before rotation, in units of the parent's reach
const SQUARE: [(f64, f64); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)];

/// Roche limit of a body of `radius` and `mass` next to a body of `other_mass`
pub fn roche_limit(radius: f64, mass: f64, other_mass: f64) -> f64 {
    radius * ROCHE_COEFFICIENT * (other_mass / mass).cbrt()
}

/// true when each of the four daughters would stay above the fragment floor
pub fn can_split(body: &Body, min_fragment_mass: f64) -> bool {
    body.mass / 4.0 > min_fragment_mass
}

/// SplitAngle struct
///
/// Rotation applied to the 2x2 daughter square, drawn once per split so
/// repeated fragmentation does not line up into a lattice.
#[derive(Debug, Clone)]
pub struct SplitAngle {
    distribution: Uniform<f64>,
}

impl SplitAngle {
    pub fn new() -> Result<Self, SimError> {
        let distribution = Uniform::new(0.0, FRAC_PI_2).map_err(|e| SimError::InvalidConfig {
            field: "split_angle",
            reason: e.to_string(),
        })?;
        Ok(SplitAngle { distribution })
    }

    /// radians in [0, pi/2)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.distribution.sample(rng)
    }
}

/// Flag every body that sits inside the Roche limit of some neighbor.
/// Returns how many bodies carry the flag afterwards.
pub fn flag_disruptions(bodies: &mut [Body]) -> usize {
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (one, two) = (&bodies[i], &bodies[j]);
            let distance = one.distance_to(two.get_position());

            let one_torn = distance < roche_limit(one.radius, one.mass, two.mass);
            let two_torn = distance < roche_limit(two.radius, two.mass, one.mass);

            if one_torn {
                bodies[i].pending_disruption = true;
            }
            if two_torn {
                bodies[j].pending_disruption = true;
            }
        }
    }

    bodies.iter().filter(|b| b.pending_disruption).count()
}

/// Break `parent` into four daughters of a quarter of its mass and volume.
///
/// Daughters sit on a 2x2 square around the parent's centroid, rotated by
/// `angle`, and keep the parent's velocity and tint exactly.
pub fn split_body(parent: &Body, ids: &mut IdAllocator, angle: f64) -> [Body; 4] {
    let mass = parent.mass / 4.0;
    let radius = radius_for_volume(parent.volume() / 4.0);
    let reach = parent.radius - radius / 2.0;
    let rotation = DVec2::from_angle(angle);

    SQUARE.map(|(i, j)| {
        let position = parent.position + rotation.rotate(DVec2::new(i * reach, j * reach));
        Body::new(ids.next_id())
            .set_size(mass, radius)
            .set_position(position.x, position.y)
            .set_velocity(parent.velocity.x, parent.velocity.y)
            .set_tint(parent.tint)
            .set_name(parent.name.clone())
            .build()
    })
}

/// Run the Roche check over the population and split what it flags.
///
/// Daughters are inserted where their parent was. Flagged bodies below the
/// fragment floor stay whole. No flag survives the call.
pub fn resolve_disruptions<R: Rng + ?Sized>(
    bodies: &mut Vec<Body>,
    ids: &mut IdAllocator,
    min_fragment_mass: f64,
    angles: &SplitAngle,
    rng: &mut R,
) -> Vec<Split> {
    let flagged = flag_disruptions(bodies);
    if flagged == 0 {
        return Vec::new();
    }

    let mut splits = Vec::new();
    let mut next = Vec::with_capacity(bodies.len() + 3 * flagged);

    for mut body in bodies.drain(..) {
        if body.pending_disruption && can_split(&body, min_fragment_mass) {
            let daughters = split_body(&body, ids, angles.sample(rng));
            let children = daughters.each_ref().map(Body::id);
            debug!(
                "tidal split of {} ({:.3e} kg) into {:?}",
                body.id(),
                body.mass,
                children
            );
            splits.push(Split {
                parent: body.id(),
                children,
            });
            next.extend(daughters);
        } else {
            body.pending_disruption = false;
            next.push(body);
        }
    }

    *bodies = next;
    splits
}
