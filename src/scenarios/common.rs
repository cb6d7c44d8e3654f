//! Shared scene-building helpers the individual scenario modules draw on.

use embryogen_building_blocks::PhysicsParameters;
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{FrontOfficer, SceneControls, Transport};

/// A scene box big enough for the handful of nuclei our scenarios place,
/// with a resolution fine enough to resolve a 20 μm nucleus in a handful of
/// voxels without producing an unreasonably large mask image.
pub fn default_scene() -> SceneControls {
    SceneControls {
        scene_offset: Vec3::splat(0.0),
        scene_size: Vec3::new(200.0, 200.0, 100.0),
        img_res: Vec3::splat(2.0),
        ..Default::default()
    }
}

pub fn scene_centre(scene: &SceneControls) -> Vec3<f32> {
    scene.scene_offset + scene.scene_size * 0.5
}

pub fn default_physics() -> PhysicsParameters {
    PhysicsParameters::default()
}

/// Builds `n_fos` `FrontOfficer`s wired into one transport mesh, each
/// started with an empty agent set.
pub fn build_front_officers(n_fos: usize) -> Vec<FrontOfficer> {
    Transport::build(n_fos)
        .into_iter()
        .enumerate()
        .map(|(rank, transport)| FrontOfficer::new(rank, n_fos, transport))
        .collect()
}
