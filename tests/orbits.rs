use nbody2d::objects::config::GRAVITATIONAL_CONSTANT;
use nbody2d::objects::gravity::{GravityParams, angular_momentum, total_energy};
use nbody2d::{BodySpec, PhysicsMode, SimConfig, Simulation};
use std::f64::consts::PI;

const SUN_MASS: f64 = 1.989e30;
const SUN_RADIUS: f64 = 6.9634e8;
const SEPARATION: f64 = 1.0e13;

/// Two suns on a circular orbit around their common barycenter
fn binary() -> Vec<BodySpec> {
    let half = SEPARATION / 2.0;
    let v = (GRAVITATIONAL_CONSTANT * SUN_MASS / (2.0 * SEPARATION)).sqrt();
    vec![
        BodySpec::new(SUN_MASS, SUN_RADIUS, -half, 0.0, 0.0, -v),
        BodySpec::new(SUN_MASS, SUN_RADIUS, half, 0.0, 0.0, v),
    ]
}

fn config(mode: PhysicsMode) -> SimConfig {
    SimConfig::default()
        .with_base_step(60.0)
        .with_history_len(0)
        .with_workers(2)
        .with_mode(mode)
        .with_seed(1)
}

fn run_drift(mode: PhysicsMode) {
    let params = GravityParams {
        g: GRAVITATIONAL_CONSTANT,
        softening: 0.0,
    };
    let mut sim = Simulation::new(config(mode), &binary()).unwrap();
    let e0 = total_energy(sim.bodies(), &params);
    let l0 = angular_momentum(sim.bodies());

    for _ in 0..10_000 {
        let report = sim.advance_frame();
        assert!(!report.restructured());
    }

    assert_eq!(sim.bodies().len(), 2);
    let e1 = total_energy(sim.bodies(), &params);
    let l1 = angular_momentum(sim.bodies());

    assert!(((e1 - e0) / e0).abs() < 1e-4, "energy drift {e0} -> {e1}");
    assert!(((l1 - l0) / l0).abs() < 1e-9, "angular momentum drift {l0} -> {l1}");
}

#[test]
fn circular_binary_conserves_energy_serial() {
    run_drift(PhysicsMode::SerialPrecise);
}

#[test]
fn circular_binary_conserves_energy_parallel() {
    run_drift(PhysicsMode::ParallelPrecise);
}

const TICKS_PER_ORBIT: u32 = 200;
const ORBITS: u32 = 5;

/// Unit masses one unit apart with G = 1. Each body circles the origin at
/// radius 1/2 with speed sqrt(1/2), so one orbit takes pi * sqrt(2).
fn unit_binary() -> (SimConfig, Vec<BodySpec>) {
    let v = 0.5_f64.sqrt();
    let period = PI / v;
    let config = SimConfig::default()
        .with_g(1.0)
        .with_base_step(period / f64::from(TICKS_PER_ORBIT))
        .with_history_len(0)
        .with_workers(2)
        .with_seed(1);
    let specs = vec![
        BodySpec::new(1.0, 0.01, -0.5, 0.0, 0.0, -v),
        BodySpec::new(1.0, 0.01, 0.5, 0.0, 0.0, v),
    ];
    (config, specs)
}

/// Over several full orbits a first-order explicit scheme gains energy
/// every step and spirals out; semi-implicit Euler only wobbles around the
/// true value and keeps angular momentum to rounding.
fn run_full_orbits(mode: PhysicsMode) {
    let params = GravityParams {
        g: 1.0,
        softening: 0.0,
    };
    let (config, specs) = unit_binary();
    let mut sim = Simulation::new(config.with_mode(mode), &specs).unwrap();
    let e0 = total_energy(sim.bodies(), &params);
    let l0 = angular_momentum(sim.bodies());

    let mut worst = 0.0_f64;
    for _ in 0..TICKS_PER_ORBIT * ORBITS {
        let report = sim.advance_frame();
        assert!(!report.restructured());
        let e = total_energy(sim.bodies(), &params);
        worst = worst.max(((e - e0) / e0).abs());
    }

    let l1 = angular_momentum(sim.bodies());
    assert!(worst < 0.05, "energy strayed {worst} over {ORBITS} orbits");
    assert!(((l1 - l0) / l0).abs() < 1e-10, "angular momentum drift {l0} -> {l1}");

    let separation = sim.bodies()[0].position.distance(sim.bodies()[1].position);
    assert!((separation - 1.0).abs() < 0.1, "separation {separation}");
}

#[test]
fn unit_binary_stays_bound_over_full_orbits_serial() {
    run_full_orbits(PhysicsMode::SerialPrecise);
}

#[test]
fn unit_binary_stays_bound_over_full_orbits_parallel() {
    run_full_orbits(PhysicsMode::ParallelPrecise);
}

#[test]
fn barycenter_stays_put_for_symmetric_binary() {
    let mut sim = Simulation::new(config(PhysicsMode::SerialPrecise), &binary()).unwrap();
    for _ in 0..1_000 {
        sim.advance_frame();
    }
    // the pair moves about 1.5e8 m each, the centroid should not
    assert!(sim.barycenter().length() < 1.0);
}

#[test]
fn fast_mode_covers_the_same_time_in_fewer_ticks() {
    let mut precise = Simulation::new(
        config(PhysicsMode::SerialPrecise).with_time_mult(16),
        &binary(),
    )
    .unwrap();
    let mut fast = Simulation::new(config(PhysicsMode::Fast).with_time_mult(16), &binary()).unwrap();

    for _ in 0..50 {
        precise.advance_frame();
        fast.advance_frame();
    }

    assert_eq!(precise.clock().ticks, 800);
    assert_eq!(fast.clock().ticks, 50);
    assert!((precise.clock().elapsed - fast.clock().elapsed).abs() < 1e-6);

    // both still trace the same orbit to well within a sun radius
    let gap = precise.bodies()[0].position.distance(fast.bodies()[0].position);
    assert!(gap < SUN_RADIUS, "fast mode drifted {gap} m away");
}
