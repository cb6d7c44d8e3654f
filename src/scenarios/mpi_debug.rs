//! No agents anywhere; exists purely to exercise the collective protocol
//! (AABB exchange, dictionary sync, barriers) across three FrontOfficers
//! with an empty population, matching the source's own MPI smoke test.

use embryogen_concepts::errors::EmbryoGenError;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_scene};

const FO_COUNT: usize = 3;

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.1,
        stop_time: 0.3,
        expo_time: 0.5,
        fo_count: FO_COUNT,
        mask_enabled: false,
        ..default_scene()
    }
}

pub fn build(scene: &SceneControls) -> Vec<FrontOfficer> {
    build_front_officers(scene.fo_count)
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
    fn the_collective_completes_with_zero_agents_and_three_ranks() {
        let director = run().unwrap();
        assert_eq!(director.ctc.rows().count(), 0);
        assert!(director.frame_count > 0);
        assert!(director.curr_time >= scene().stop_time);
    }
}
