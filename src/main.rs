use bevy::log::LogPlugin;
use bevy::prelude::*;
use nbody2d::objects::config::GRAVITATIONAL_CONSTANT;
use nbody2d::{BodySpec, NBodyPlugin, PhysicsMode, SimConfig, Simulation, Tint};
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, TAU};

const FRAMES: u32 = 600;

/// Main Entry Point
///
/// Headless run of the tidal disruption demo: four suns on circular orbits
/// around a supermassive black hole, close enough to be torn apart. The
/// body of the simulation lives in the `NBodyPlugin`; this only seeds it
/// and pumps frames.
fn main() {
    let mut app = App::new();
    app.add_plugins(LogPlugin::default())
        .add_plugins(NBodyPlugin::new(demo_config(), tidal_demo()));
    app.finish();
    app.cleanup();

    for _ in 0..FRAMES {
        app.update();
    }

    if let Some(sim) = app.world().get_resource::<Simulation>() {
        let bary = sim.barycenter();
        info!(
            "{} bodies after {:.0} simulated seconds, barycenter at ({:.3e}, {:.3e})",
            sim.bodies().len(),
            sim.clock().elapsed,
            bary.x,
            bary.y
        );
    }
}

fn demo_config() -> SimConfig {
    SimConfig::default()
        .with_min_fragment_mass(1.0e28)
        .with_mode(PhysicsMode::Fast)
}

fn tidal_demo() -> Vec<BodySpec> {
    let mut rng = rand::rng();

    // Sagittarius A*
    let hole_mass = 8.26e36;
    let hole_radius = 1.2e10;
    let mut bodies = vec![
        BodySpec::new(hole_mass, hole_radius, 0.0, 0.0, 0.0, 0.0)
            .named("Sagittarius A*")
            .tinted(Tint::BlackHole),
    ];

    let sun_mass = 1.989e30;
    let sun_radius = 6.9634e8;
    for i in 0..4 {
        let t = rng.random_range(0.0..TAU);
        let r = hole_radius * 2.0 * f64::from(i + 1);
        let v = (GRAVITATIONAL_CONSTANT * hole_mass / r).sqrt();
        bodies.push(
            BodySpec::new(
                sun_mass,
                sun_radius,
                r * t.cos(),
                r * t.sin(),
                v * (t + FRAC_PI_2).cos(),
                v * (t + FRAC_PI_2).sin(),
            )
            .named(format!("sun {}", i + 1)),
        );
    }

    bodies
}
