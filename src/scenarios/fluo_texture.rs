//! A single nucleus with the phantom/optics export toggles turned on.
//! Texture synthesis itself (the fluorescence accumulator) is an external
//! collaborator concern per scope; this scenario exists so the CLI table
//! and `SceneControls` toggles have a named entry point to turn on once
//! that renderer lands.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::Spheres;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.1,
        stop_time: 1.0,
        expo_time: 0.5,
        fo_count: 1,
        phantom_enabled: true,
        optics_enabled: true,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(1);
    let fo = &mut fos[0];
    let id = fo.next_agent_id().expect("FO id range exhausted");
    let shape = Spheres::new(vec![scene_centre(scene)], vec![18.0]);
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
    fn runs_to_completion_with_phantom_and_optics_toggles_set() {
        let director = run().unwrap();
        assert!(director.frame_count > 0);
    }
}
