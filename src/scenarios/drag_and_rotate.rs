//! One nucleus dragged in a straight line for the first half of the run,
//! then given a rotated desired velocity for the second half, exercising
//! the `updateControls` hook's ability to mutate a live agent's drive
//! target mid-simulation.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::Spheres;
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

const SWITCH_TIME: f32 = 1.0;
const DRAG_VELOCITY: Vec3<f32> = Vec3 { x: 10.0, y: 0.0, z: 0.0 };
const ROTATED_VELOCITY: Vec3<f32> = Vec3 { x: 0.0, y: 10.0, z: 0.0 };

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.1,
        stop_time: 2.0,
        expo_time: 0.5,
        fo_count: 1,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(1);
    let fo = &mut fos[0];
    let id = fo.next_agent_id().expect("FO id range exhausted");
    let shape = Spheres::new(vec![scene_centre(scene)], vec![15.0]);
    let mut agent = NucleusAgent::new(
        id,
        "nucleus",
        NucleusVariant::Ns,
        shape,
        scene.init_time,
        scene.incr_time,
        default_physics(),
    );
    agent.set_velocity_currently_desired(DRAG_VELOCITY);
    fo.start_new_agent(agent, 0);

    let mut rotated = false;
    fo.set_update_controls(move |fo, t_future| {
        if !rotated && t_future >= SWITCH_TIME {
            if let Some(agent) = fo.agents.get_mut(&id).and_then(|a| a.as_nucleus_mut()) {
                agent.set_velocity_currently_desired(ROTATED_VELOCITY);
            }
            rotated = true;
        }
    });
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
    fn runs_to_completion_with_one_tracked_nucleus() {
        let director = run().unwrap();
        assert!(director.frame_count > 0);
        assert_eq!(director.ctc.rows().count(), 1);
    }
}
