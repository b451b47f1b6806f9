//! Mergers.rs
//!
//! Collision resolution. Overlapping bodies merge into one body that keeps
//! the total mass, the total momentum and the total volume of its parents.
//! Merging can create new overlaps, so the population is rescanned until a
//! scan finds nothing.

use crate::objects::lineage::Merger;
use crate::objects::movables::{Body, BodyId, IdAllocator, Tint, radius_for_volume};
use crate::objects::traits::collisions::CollisionDetection;
use log::debug;

/// share of the remaining distance to white added to every channel of a blend,
/// keeps repeated merges from averaging toward black
pub const WHITE_BIAS: f64 = 0.02;

/// Mass-weighted blend of two tints. A black hole swallows any color.
pub fn blend_tints(first: Tint, first_mass: f64, second: Tint, second_mass: f64) -> Tint {
    match (first, second) {
        (Tint::BlackHole, _) | (_, Tint::BlackHole) => Tint::BlackHole,
        (
            Tint::Normal {
                r: r1,
                g: g1,
                b: b1,
            },
            Tint::Normal {
                r: r2,
                g: g2,
                b: b2,
            },
        ) => {
            let total = first_mass + second_mass;
            let channel = |c1: u8, c2: u8| -> u8 {
                let mixed = (f64::from(c1) * first_mass + f64::from(c2) * second_mass) / total;
                let nudged = mixed + (255.0 - mixed) * WHITE_BIAS;
                nudged.round().clamp(0.0, 255.0) as u8
            };
            Tint::rgb(channel(r1, r2), channel(g1, g2), channel(b1, b2))
        }
    }
}

/// Merge two bodies into a new body with id `id`.
///
/// Position is the center of mass, velocity conserves momentum and the
/// radius conserves volume. Lineage and name come from the heavier parent;
/// on equal masses `one` wins.
pub fn merge_bodies(one: &Body, two: &Body, id: BodyId) -> Body {
    let mass = one.mass + two.mass;

    let position = (one.position * one.mass + two.position * two.mass) / mass;
    let velocity = (one.momentum() + two.momentum()) / mass;
    let radius = radius_for_volume(one.volume() + two.volume());

    let heavier = if one.mass >= two.mass { one } else { two };

    Body::new(id)
        .set_size(mass, radius)
        .set_position(position.x, position.y)
        .set_velocity(velocity.x, velocity.y)
        .set_tint(blend_tints(one.tint, one.mass, two.tint, two.mass))
        .set_name(heavier.name.clone())
        .set_lineage(heavier.lineage)
        .build()
}

/// MergeFrame struct
///
/// One scan over all pairs. Each body is claimed by at most one pair, so
/// the pairs of a frame are disjoint and can all be applied at once without
/// shifting any index the scan relied on.
#[derive(Debug, Default)]
pub struct MergeFrame {
    pairs: Vec<(usize, usize)>,
}

impl MergeFrame {
    pub fn scan(bodies: &[Body]) -> Self {
        let mut claimed = vec![false; bodies.len()];
        let mut pairs = Vec::new();

        for i in 0..bodies.len() {
            if claimed[i] {
                continue;
            }
            for j in (i + 1)..bodies.len() {
                if claimed[j] {
                    continue;
                }
                if bodies[i].collided(&bodies[j]) {
                    claimed[i] = true;
                    claimed[j] = true;
                    pairs.push((i, j));
                    break;
                }
            }
        }

        MergeFrame { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replace every claimed pair by its merged body. The merged body takes
    /// the slot of the lower index, the higher slot is dropped.
    pub fn apply(self, bodies: &mut Vec<Body>, ids: &mut IdAllocator) -> Vec<Merger> {
        let mut slots: Vec<Option<Body>> = bodies.drain(..).map(Some).collect();
        let mut mergers = Vec::with_capacity(self.pairs.len());

        for (i, j) in self.pairs {
            if let (Some(one), Some(two)) = (slots[i].take(), slots[j].take()) {
                let merged = merge_bodies(&one, &two, ids.next_id());
                debug!(
                    "merged {} ({:.3e} kg) and {} ({:.3e} kg) into {} ({:.3e} kg)",
                    one.id(),
                    one.mass,
                    two.id(),
                    two.mass,
                    merged.id(),
                    merged.mass
                );
                mergers.push(Merger {
                    parents: [one.id(), two.id()],
                    child: merged.id(),
                });
                slots[i] = Some(merged);
            }
        }

        bodies.extend(slots.into_iter().flatten());
        mergers
    }
}

/// Merge overlapping bodies until no pair overlaps.
///
/// Every merge removes exactly one body, so at most `n - 1` merges happen
/// and the loop always ends.
pub fn resolve_collisions(bodies: &mut Vec<Body>, ids: &mut IdAllocator) -> Vec<Merger> {
    let mut mergers = Vec::new();

    loop {
        let frame = MergeFrame::scan(bodies);
        if frame.is_empty() {
            break;
        }
        mergers.extend(frame.apply(bodies, ids));
    }

    mergers
}
