//! A grid of nuclei dropped in from above a packed lattice, a stress test
//! for the body/slide force recipes' ability to settle a dense overlapping
//! stack without the simulation diverging.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::Spheres;
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

const GRID: usize = 3;
const RADIUS: f32 = 8.0;
const DROP_HEIGHT: f32 = 60.0;
const DRIFT_VELOCITY: Vec3<f32> = Vec3 { x: 0.0, y: 0.0, z: -15.0 };

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.05,
        stop_time: 2.0,
        expo_time: 0.5,
        fo_count: 1,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(1);
    let centre = scene_centre(scene);
    let fo = &mut fos[0];

    let step = RADIUS * 1.8;
    let half = (GRID as f32 - 1.0) / 2.0;
    for gx in 0..GRID {
        for gy in 0..GRID {
            let offset = Vec3::new((gx as f32 - half) * step, (gy as f32 - half) * step, DROP_HEIGHT);
            let id = fo.next_agent_id().expect("FO id range exhausted");
            let shape = Spheres::new(vec![centre + offset], vec![RADIUS]);
            let mut nucleus = NucleusAgent::new(
                id,
                "nucleus",
                NucleusVariant::Ns,
                shape,
                scene.init_time,
                scene.incr_time,
                default_physics(),
            );
            nucleus.set_velocity_currently_desired(DRIFT_VELOCITY);
            fo.start_new_agent(nucleus, 0);
        }
    }
    fos
}

pub fn run() -> Result<Director, EmbryoGenError> {
    let scene = scene();
    let fos = build(&scene);
    embryogen_core::run::run_to_completion(scene, fos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_full_grid_of_nuclei() {
        let scene = scene();
        let fos = build(&scene);
        assert_eq!(fos[0].agents.len(), GRID * GRID);
    }

    #[test]
    fn the_stack_settles_without_diverging() {
        let director = run().unwrap();
        assert_eq!(director.ctc.rows().count(), GRID * GRID);
    }
}
