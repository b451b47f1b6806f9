use bevy::prelude::*;
use log::error;

use crate::objects::config::SimConfig;
use crate::objects::gamestate::{LastFrame, Selection};
use crate::objects::movables::BodySpec;
use crate::objects::simulation::Simulation;

/// NBodyPlugin
///
/// Puts a [`Simulation`] in the app and advances it once per `Update`. The
/// selection is remapped right after, so systems running later in the frame
/// see ids that exist.
pub struct NBodyPlugin {
    pub config: SimConfig,
    pub bodies: Vec<BodySpec>,
}

impl NBodyPlugin {
    pub fn new(config: SimConfig, bodies: Vec<BodySpec>) -> Self {
        NBodyPlugin { config, bodies }
    }
}

impl Plugin for NBodyPlugin {
    fn build(&self, app: &mut App) {
        match Simulation::new(self.config.clone(), &self.bodies) {
            Ok(sim) => {
                app.insert_resource(sim);
            }
            Err(e) => {
                error!("nbody simulation not started: {e}");
                return;
            }
        }
        app.init_resource::<LastFrame>();
        app.init_resource::<Selection>();
        app.add_systems(Update, (advance_simulation, follow_selection).chain());
    }
}

fn advance_simulation(mut sim: ResMut<Simulation>, mut last: ResMut<LastFrame>) {
    last.0 = sim.advance_frame();
}

fn follow_selection(sim: Res<Simulation>, last: Res<LastFrame>, mut selection: ResMut<Selection>) {
    let Some(id) = selection.get() else {
        return;
    };

    let resolved = last.0.resolve(id);
    if sim.body(resolved).is_some() {
        if resolved != id {
            selection.select(resolved);
        }
    } else {
        // a reset or a rewind can drop the body altogether
        selection.clear();
    }
}
