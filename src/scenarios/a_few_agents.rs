//! A small, deterministically scattered population of single-sphere
//! nuclei; the lightest multi-agent smoke test short of `oneAgent`.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::Spheres;
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

const AGENT_COUNT: usize = 6;
const SEED: u64 = 42;

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.1,
        stop_time: 1.0,
        expo_time: 0.5,
        fo_count: 1,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(1);
    let centre = scene_centre(scene);
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let fo = &mut fos[0];

    for _ in 0..AGENT_COUNT {
        let offset = Vec3::new(
            rng.gen_range(-40.0..40.0_f32),
            rng.gen_range(-40.0..40.0_f32),
            rng.gen_range(-20.0..20.0_f32),
        );
        let id = fo.next_agent_id().expect("FO id range exhausted");
        let shape = Spheres::new(vec![centre + offset], vec![10.0]);
        let nucleus = NucleusAgent::new(
            id,
            "nucleus",
            NucleusVariant::Ns,
            shape,
            scene.init_time,
            scene.incr_time,
            default_physics(),
        );
        fo.start_new_agent(nucleus, 0);
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
    fn places_the_configured_agent_count_deterministically() {
        let scene = scene();
        let a = build(&scene);
        let b = build(&scene);
        assert_eq!(a[0].agents.len(), AGENT_COUNT);
        assert_eq!(b[0].agents.len(), AGENT_COUNT);
    }

    #[test]
    fn runs_to_completion() {
        let director = run().unwrap();
        assert_eq!(director.ctc.rows().count(), AGENT_COUNT);
    }
}
