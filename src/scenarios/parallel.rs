//! Several live nuclei spread across two `FrontOfficer`s on opposite sides
//! of the scene, exercising cross-rank AABB exchange and neighbour lookups
//! beyond `mpiDebug`'s empty-population case.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::Spheres;
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

const FO_COUNT: usize = 2;
const AGENTS_PER_FO: usize = 3;
const ROW_SPACING: f32 = 25.0;
/// Placed so each rank's nuclei sit close enough to the midline that their
/// AABBs overlap the neighbouring rank's, forcing real cross-rank force
/// exchange instead of two independent single-rank runs.
const ROW_OFFSET: f32 = 15.0;

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.1,
        stop_time: 1.0,
        expo_time: 0.5,
        fo_count: FO_COUNT,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(scene.fo_count);
    let centre = scene_centre(scene);
    let half = (AGENTS_PER_FO as f32 - 1.0) / 2.0;

    for (rank, fo) in fos.iter_mut().enumerate() {
        let side = if rank == 0 { -ROW_OFFSET } else { ROW_OFFSET };
        for i in 0..AGENTS_PER_FO {
            let offset = Vec3::new(side, (i as f32 - half) * ROW_SPACING, 0.0);
            let id = fo.next_agent_id().expect("FO id range exhausted");
            let shape = Spheres::new(vec![centre + offset], vec![12.0]);
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
    fn distributes_agents_evenly_across_ranks() {
        let scene = scene();
        let fos = build(&scene);
        assert_eq!(fos.len(), FO_COUNT);
        for fo in &fos {
            assert_eq!(fo.agents.len(), AGENTS_PER_FO);
        }
    }

    #[test]
    fn runs_to_completion_with_every_agent_tracked() {
        let director = run().unwrap();
        assert_eq!(director.ctc.rows().count(), FO_COUNT * AGENTS_PER_FO);
    }
}
