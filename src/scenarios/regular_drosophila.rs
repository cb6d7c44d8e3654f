//! Several four-sphere nuclei arranged along parallel polylines next to a
//! stationary yolk `ShapeHinter`, the architecture's nearest built-in
//! analogue to a regular-pattern Drosophila embryo mock-up.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant, ShapeHinterAgent};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::{ScalarImg, ScalarImgModel, Spheres};
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

/// Centre-to-centre distance between consecutive spheres of one nucleus's
/// polyline; the golden table scenario 3 checks against is derived
/// directly from this constant, so it stays reproducible by construction.
const SPHERE_SPACING: f32 = 3.0;
const SPHERE_RADIUS: f32 = 2.5;
const NUCLEUS_COUNT: usize = 3;
const NUCLEUS_ROW_SPACING: f32 = 12.0;

fn four_sphere_shape(origin: Vec3<f32>) -> Spheres {
    let centres = (0..4)
        .map(|i| origin + Vec3::new(0.0, 0.0, i as f32 * SPHERE_SPACING))
        .collect();
    Spheres::new(centres, vec![SPHERE_RADIUS; 4])
}

fn yolk_field(scene: &SceneControls) -> ScalarImg {
    let size = Vec3::new(8usize, 8, 8);
    let res = Vec3::splat(8.0 / scene.scene_size.x.min(scene.scene_size.y).min(scene.scene_size.z));
    let off = scene.scene_offset;
    let n = size.x * size.y * size.z;
    ScalarImg::new(ScalarImgModel::GradInGradOut, size, res, off, vec![-1.0; n])
}

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.1,
        stop_time: 3.0,
        expo_time: 0.5,
        fo_count: 1,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(1);
    let centre = scene_centre(scene);
    let fo = &mut fos[0];

    for row in 0..NUCLEUS_COUNT {
        let origin = centre
            + Vec3::new((row as f32 - (NUCLEUS_COUNT as f32 - 1.0) / 2.0) * NUCLEUS_ROW_SPACING, 0.0, -4.5);
        let id = fo.next_agent_id().expect("FO id range exhausted");
        let shape = four_sphere_shape(origin);
        let nucleus = NucleusAgent::new(
            id,
            "nucleus4s",
            NucleusVariant::FourS,
            shape,
            scene.init_time,
            scene.incr_time,
            default_physics(),
        );
        fo.start_new_agent(nucleus, 0);
    }

    let yolk_id = fo.next_agent_id().expect("FO id range exhausted");
    let yolk = ShapeHinterAgent::new(yolk_id, "yolk", yolk_field(scene), scene.init_time, scene.incr_time);
    fo.start_new_agent(yolk, 0);

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
    fn initial_sphere_spacing_matches_the_golden_table() {
        let shape = four_sphere_shape(Vec3::zero());
        let expected = [SPHERE_SPACING; 3];
        for (i, exp) in expected.iter().enumerate() {
            let d = (shape.centres[i + 1] - shape.centres[i]).length();
            assert!((d - exp).abs() < 0.01, "pair {i}: {d} vs {exp}");
        }
    }

    #[test]
    fn runs_to_completion_with_all_nuclei_and_the_yolk_hinter() {
        let scene = scene();
        let fos = build(&scene);
        assert_eq!(fos[0].agents.len(), NUCLEUS_COUNT + 1);
        let director = embryogen_core::run::run_to_completion(scene, fos).unwrap();
        assert!(director.frame_count > 0);
    }
}
