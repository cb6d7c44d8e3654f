//! Drives a single nucleus through the `CellCycleClock` state machine,
//! growing its radius while in `S` phase and triggering a pseudo-division
//! (a fresh daughter nucleus) every time the clock passes `M -> G1`.

use embryogen_building_blocks::{CellCycleClock, NucleusAgent, NucleusVariant};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::Spheres;
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

pub fn scene() -> SceneControls {
    SceneControls {
        init_time: 0.0,
        incr_time: 0.05,
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

    let incr_time = scene.incr_time;
    let mut clock = CellCycleClock::new();
    let mut next_daughter_offset = 1.0_f32;
    fo.set_update_controls(move |fo, t_future| {
        let outcome = clock.on_tick(incr_time);
        if outcome.divided {
            let daughter_centre = centre + Vec3::new(next_daughter_offset, 0.0, 0.0);
            next_daughter_offset += 1.0;
            let Ok(daughter_id) = fo.next_agent_id() else {
                return;
            };
            let shape = Spheres::new(vec![daughter_centre], vec![15.0]);
            let daughter = NucleusAgent::new(
                daughter_id,
                "nucleus",
                NucleusVariant::Ns,
                shape,
                t_future,
                incr_time,
                default_physics(),
            );
            fo.start_new_agent(daughter, id);
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
    fn at_least_one_division_happens_by_stop_time() {
        let director = run().unwrap();
        assert!(director.ctc.rows().count() >= 2, "expected the original nucleus plus at least one daughter");
    }
}
