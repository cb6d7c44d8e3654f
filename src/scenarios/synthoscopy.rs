//! A nucleus guided by a `TrajectoriesHinter` built from a short synthetic
//! track, the simplest scenario that exercises the vector-field hinter
//! path end to end.

use embryogen_building_blocks::{NucleusAgent, NucleusVariant, TrackRecord, TrajectoriesHinterAgent};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::{Spheres, VectorImg, VectorImgPolicy};
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

const SYNTHETIC_TRACK: &str = "\
0.0 0.0 0.0 0.0 1 0 0
1.0 20.0 0.0 0.0 1 0 0
2.0 40.0 0.0 0.0 1 0 0
";

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

fn track_field(scene: &SceneControls) -> VectorImg {
    let size = Vec3::new(16usize, 16, 4);
    let res = Vec3::splat(16.0 / scene.scene_size.x);
    let off = scene.scene_offset;
    let n = size.x * size.y * size.z;
    VectorImg::new(
        VectorImgPolicy::AvgVec,
        size,
        res,
        off,
        vec![0.0; n],
        vec![0.0; n],
        vec![0.0; n],
    )
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    let mut fos = build_front_officers(1);
    let centre = scene_centre(scene);
    let fo = &mut fos[0];

    let id = fo.next_agent_id().expect("FO id range exhausted");
    let shape = Spheres::new(vec![centre], vec![15.0]);
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

    let tracks = TrackRecord::parse(SYNTHETIC_TRACK, Vec3::splat(1.0), 1.0, 0.0)
        .expect("built-in synthetic track is well-formed");
    let hinter_id = fo.next_agent_id().expect("FO id range exhausted");
    let hinter = TrajectoriesHinterAgent::new(
        hinter_id,
        "track_hinter",
        tracks,
        track_field(scene),
        scene.init_time,
        scene.incr_time,
    );
    fo.start_new_agent(hinter, 0);

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
    fn runs_to_completion_with_the_nucleus_and_the_track_hinter() {
        let scene = scene();
        let fos = build(&scene);
        assert_eq!(fos[0].agents.len(), 2);
        let director = embryogen_core::run::run_to_completion(scene, fos).unwrap();
        assert!(director.frame_count > 0);
    }
}
