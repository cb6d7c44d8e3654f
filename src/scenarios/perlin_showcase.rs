//! A `ShapeHinter` driven by a deterministic value-noise field instead of a
//! signed distance transform, showing the hinter pipeline can carry an
//! arbitrary scalar bias. The dependency stack carries no Perlin/Simplex
//! noise crate, so the field is seeded value noise built from `rand_chacha`
//! lattice samples with trilinear interpolation, rather than a true Perlin
//! implementation.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant, ShapeHinterAgent};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::{ScalarImg, ScalarImgModel, Spheres};
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

const SEED: u64 = 7;
const LATTICE: usize = 4;
const FIELD_SIZE: usize = 16;

fn lattice_values(seed: u64) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..LATTICE * LATTICE * LATTICE)
        .map(|_| rng.gen_range(-1.0_f32..1.0))
        .collect()
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Trilinearly interpolated value noise over the `LATTICE^3` grid of random
/// samples, evaluated at a normalized coordinate in `[0, LATTICE - 1]`.
fn sample(lattice: &[f32], p: Vec3<f32>) -> f32 {
    let x0 = p.x.floor().clamp(0.0, (LATTICE - 2) as f32) as usize;
    let y0 = p.y.floor().clamp(0.0, (LATTICE - 2) as f32) as usize;
    let z0 = p.z.floor().clamp(0.0, (LATTICE - 2) as f32) as usize;
    let tx = p.x - x0 as f32;
    let ty = p.y - y0 as f32;
    let tz = p.z - z0 as f32;

    let at = |x: usize, y: usize, z: usize| -> f32 { lattice[(z * LATTICE + y) * LATTICE + x] };

    let c00 = lerp(at(x0, y0, z0), at(x0 + 1, y0, z0), tx);
    let c10 = lerp(at(x0, y0 + 1, z0), at(x0 + 1, y0 + 1, z0), tx);
    let c01 = lerp(at(x0, y0, z0 + 1), at(x0 + 1, y0, z0 + 1), tx);
    let c11 = lerp(at(x0, y0 + 1, z0 + 1), at(x0 + 1, y0 + 1, z0 + 1), tx);
    let c0 = lerp(c00, c10, ty);
    let c1 = lerp(c01, c11, ty);
    lerp(c0, c1, tz)
}

fn noise_field(scene: &SceneControls) -> ScalarImg {
    let size = Vec3::new(FIELD_SIZE, FIELD_SIZE, FIELD_SIZE);
    let res = Vec3::splat(FIELD_SIZE as f32 / scene.scene_size.x.min(scene.scene_size.y).min(scene.scene_size.z));
    let off = scene.scene_offset;
    let lattice = lattice_values(SEED);
    let scale = (LATTICE - 1) as f32 / FIELD_SIZE as f32;

    let mut voxels = Vec::with_capacity(FIELD_SIZE * FIELD_SIZE * FIELD_SIZE);
    for z in 0..FIELD_SIZE {
        for y in 0..FIELD_SIZE {
            for x in 0..FIELD_SIZE {
                let p = Vec3::new(x as f32 * scale, y as f32 * scale, z as f32 * scale);
                voxels.push(sample(&lattice, p));
            }
        }
    }
    ScalarImg::new(ScalarImgModel::GradInZeroOut, size, res, off, voxels)
}

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
    let fo = &mut fos[0];

    let id = fo.next_agent_id().expect("FO id range exhausted");
    let shape = Spheres::new(vec![centre], vec![15.0]);
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

    let field_id = fo.next_agent_id().expect("FO id range exhausted");
    let field = ShapeHinterAgent::new(field_id, "noise_field", noise_field(scene), scene.init_time, scene.incr_time);
    fo.start_new_agent(field, 0);

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
    fn noise_field_is_deterministic_for_a_fixed_seed() {
        let a = lattice_values(SEED);
        let b = lattice_values(SEED);
        assert_eq!(a, b);
    }

    #[test]
    fn runs_to_completion_with_the_noise_hinter() {
        let director = run().unwrap();
        assert!(director.frame_count > 0);
    }
}
