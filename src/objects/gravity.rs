//! Gravity.rs
//!
//! Brute-force pairwise gravity integrated with semi-implicit Euler. The
//! velocity phase reads a snapshot of every position before any body moves,
//! then the position phase drifts the whole population with the updated
//! velocities. Splitting the work into these two phases is what makes the
//! result independent of the order bodies are visited in.

use crate::objects::movables::Body;
use bevy::math::DVec2;

/// Attractor struct
///
/// Read-only copy of the state the velocity phase needs from every body
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Attractor {
    pub position: DVec2,
    pub mass: f64,
}

/// GravityParams struct
///
/// - g = gravitational constant
/// - softening = S, separation used for the magnitude is sqrt(d^2 + S^2)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GravityParams {
    pub g: f64,
    pub softening: f64,
}

pub fn snapshot(bodies: &[Body]) -> Vec<Attractor> {
    bodies
        .iter()
        .map(|body| Attractor {
            position: body.position,
            mass: body.mass,
        })
        .collect()
}

/// Velocity phase for a contiguous run of owner bodies.
///
/// `owners[k]` is the body at index `offset + k` of `attractors`. Each pair
/// contribution is applied to the velocity as soon as it is computed, and
/// `acceleration` is overwritten with it, so after the call it holds the
/// last pair only.
///
/// Pairs at zero separation have no direction; they are skipped and
/// counted. The returned count is of ordered pairs, so two coincident
/// bodies add 2 when both are owners.
pub fn accelerate(
    owners: &mut [Body],
    offset: usize,
    attractors: &[Attractor],
    params: &GravityParams,
    dt: f64,
) -> usize {
    let softening_sq = params.softening * params.softening;
    let mut coincident = 0;

    for (k, body) in owners.iter_mut().enumerate() {
        let own = offset + k;
        let origin = attractors[own].position;

        for (j, other) in attractors.iter().enumerate() {
            if j == own {
                continue;
            }

            let delta = other.position - origin;
            let dist = delta.length();
            if dist == 0.0 {
                coincident += 1;
                continue;
            }

            let a = params.g * other.mass / (dist * dist + softening_sq);
            let acc = delta * (a / dist);

            body.acceleration = acc;
            body.velocity += acc * dt;
        }
    }

    coincident
}

/// Velocity phase for the whole population on the calling thread
pub fn accelerate_all(bodies: &mut [Body], params: &GravityParams, dt: f64) -> usize {
    let attractors = snapshot(bodies);
    accelerate(bodies, 0, &attractors, params, dt)
}

/// Position phase
pub fn drift(bodies: &mut [Body], dt: f64) {
    for body in bodies {
        body.position += body.velocity * dt;
    }
}

/// Kinetic plus (softened) potential energy of the population
pub fn total_energy(bodies: &[Body], params: &GravityParams) -> f64 {
    let softening_sq = params.softening * params.softening;
    let kinetic: f64 = bodies.iter().map(Body::kinetic_energy).sum();

    let mut potential = 0.0;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let dist_sq = bodies[i].position.distance_squared(bodies[j].position);
            let denom = (dist_sq + softening_sq).sqrt();
            if denom > 0.0 {
                potential -= params.g * bodies[i].mass * bodies[j].mass / denom;
            }
        }
    }

    kinetic + potential
}

/// Angular momentum about the origin (the z component, the only one in 2-D)
pub fn angular_momentum(bodies: &[Body]) -> f64 {
    bodies
        .iter()
        .map(|body| body.mass * body.position.perp_dot(body.velocity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::movables::BodyId;

    fn body(id: u64, mass: f64, x: f64, y: f64) -> Body {
        Body::new(BodyId(id))
            .set_size(mass, 1.0)
            .set_position(x, y)
            .build()
    }

    const UNIT: GravityParams = GravityParams {
        g: 1.0,
        softening: 0.0,
    };

    #[test]
    fn pair_accelerates_toward_each_other() {
        let mut bodies = vec![body(0, 1.0, 0.0, 0.0), body(1, 4.0, 2.0, 0.0)];
        let skipped = accelerate_all(&mut bodies, &UNIT, 1.0);

        assert_eq!(skipped, 0);
        // a = G m / d^2
        assert!((bodies[0].velocity.x - 1.0).abs() < 1e-12);
        assert!((bodies[1].velocity.x + 0.25).abs() < 1e-12);
        assert_eq!(bodies[0].velocity.y, 0.0);
    }

    #[test]
    fn velocity_phase_does_not_move_bodies() {
        let mut bodies = vec![body(0, 1.0, 0.0, 0.0), body(1, 1.0, 3.0, 4.0)];
        accelerate_all(&mut bodies, &UNIT, 10.0);
        assert_eq!(bodies[0].position, DVec2::ZERO);
        assert_eq!(bodies[1].position, DVec2::new(3.0, 4.0));

        drift(&mut bodies, 2.0);
        assert!((bodies[0].position - bodies[0].velocity * 2.0).length() < 1e-12);
    }

    #[test]
    fn acceleration_keeps_only_last_pair() {
        let mut bodies = vec![
            body(0, 1.0, 0.0, 0.0),
            body(1, 1.0, 1.0, 0.0),
            body(2, 1.0, 0.0, 2.0),
        ];
        accelerate_all(&mut bodies, &UNIT, 1.0);

        // body 0 saw body 1 then body 2, so the diagnostic holds body 2's pull
        assert!((bodies[0].acceleration - DVec2::new(0.0, 0.25)).length() < 1e-12);
        assert!((bodies[0].velocity - DVec2::new(1.0, 0.25)).length() < 1e-12);
    }

    #[test]
    fn softening_bounds_the_magnitude() {
        let params = GravityParams {
            g: 1.0,
            softening: 1.0,
        };
        let mut bodies = vec![body(0, 1.0, 0.0, 0.0), body(1, 1.0, 1.0, 0.0)];
        accelerate_all(&mut bodies, &params, 1.0);
        assert!((bodies[0].velocity.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn coincident_bodies_are_skipped_not_nan() {
        let mut bodies = vec![body(0, 1.0, 5.0, 5.0), body(1, 1.0, 5.0, 5.0)];
        let skipped = accelerate_all(&mut bodies, &UNIT, 1.0);

        assert_eq!(skipped, 2);
        assert!(bodies.iter().all(|b| b.velocity.is_finite()));
        assert_eq!(bodies[0].velocity, DVec2::ZERO);
    }

    #[test]
    fn chunked_phase_matches_whole_phase() {
        let mut whole = vec![
            body(0, 3.0, 0.0, 0.0),
            body(1, 1.0, 1.0, 2.0),
            body(2, 2.0, -3.0, 1.0),
            body(3, 5.0, 4.0, -2.0),
        ];
        let mut chunked = whole.clone();

        accelerate_all(&mut whole, &UNIT, 0.5);

        let attractors = snapshot(&chunked);
        let (head, tail) = chunked.split_at_mut(3);
        accelerate(head, 0, &attractors, &UNIT, 0.5);
        accelerate(tail, 3, &attractors, &UNIT, 0.5);

        assert_eq!(whole, chunked);
    }

    #[test]
    fn energy_and_angular_momentum_of_known_pair() {
        let mut bodies = vec![body(0, 2.0, 1.0, 0.0), body(1, 3.0, -1.0, 0.0)];
        bodies[0].velocity = DVec2::new(0.0, 1.0);

        // 0.5 * 2 * 1 - 2 * 3 / 2
        assert!((total_energy(&bodies, &UNIT) + 2.0).abs() < 1e-12);
        assert!((angular_momentum(&bodies) - 2.0).abs() < 1e-12);
    }
}
