//! A single sphere sitting still at the scene centre; the smallest
//! end-to-end check of the round driver and mask export.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant};
use embryogen_concepts::geometry::Spheres;
use embryogen_core::{Director, FrontOfficer, SceneControls};
use embryogen_concepts::errors::EmbryoGenError;

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.1,
        stop_time: 1.6,
        expo_time: 0.5,
        fo_count: 1,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(1);
    let fo = &mut fos[0];
    let id = fo.next_agent_id().expect("fresh FO has an empty id range");
    let shape = Spheres::new(vec![scene_centre(scene)], vec![20.0]);
    let agent = NucleusAgent::new(
        id,
        "nucleus",
        NucleusVariant::Ns,
        shape,
        scene.init_time,
        scene.incr_time,
        default_physics(),
    );
    fo.start_new_agent(agent, 0);
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
    fn runs_the_expected_number_of_rounds() {
        let director = run().unwrap();
        assert_eq!(director.frame_count, 16);
    }
}
