//! A mother nucleus that closes at `t = 2.0 min` and is replaced by two
//! daughters. Pins the open question left unresolved in the source: the
//! daughters skip the round in which the mother closes and start fresh in
//! the following round (mother's last touched frame is 19, daughters'
//! first frame is 20, for `incrTime = 0.1`).

use embryogen_building_blocks::{NucleusAgent, NucleusVariant};
use embryogen_concepts::errors::EmbryoGenError;
use embryogen_concepts::geometry::Spheres;
use embryogen_concepts::vec3::Vec3;
use embryogen_core::{Director, FrontOfficer, SceneControls};

use super::common::{build_front_officers, default_physics, default_scene, scene_centre};

const DIVISION_TIME: f32 = 2.0;

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
    let incr_time = scene.incr_time;
    {
        let fo = &mut fos[0];
        let mother_id = fo.next_agent_id().expect("fresh FO has an empty id range");
        let shape = Spheres::new(vec![centre], vec![20.0]);
        let mother = NucleusAgent::new(
            mother_id,
            "nucleus",
            NucleusVariant::Ns,
            shape,
            scene.init_time,
            incr_time,
            default_physics(),
        );
        fo.start_new_agent(mother, 0);

        let mut closed_mother = false;
        let mut started_daughters = false;
        fo.set_update_controls(move |fo, t_future| {
            if !closed_mother && (t_future - (DIVISION_TIME - incr_time)).abs() < incr_time / 2.0 {
                fo.close_agent(mother_id);
                closed_mother = true;
            }
            if !started_daughters && (t_future - DIVISION_TIME).abs() < incr_time / 2.0 {
                for sign in [1.0_f32, -1.0_f32] {
                    let Ok(id) = fo.next_agent_id() else {
                        break;
                    };
                    let daughter_centre = centre + Vec3::new(0.0, 0.0, sign * 5.0);
                    let shape = Spheres::new(vec![daughter_centre], vec![20.0]);
                    let daughter = NucleusAgent::new(
                        id,
                        "nucleus",
                        NucleusVariant::Ns,
                        shape,
                        t_future,
                        incr_time,
                        default_physics(),
                    );
                    fo.start_new_agent(daughter, mother_id);
                }
                started_daughters = true;
            }
        });
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
    fn ctc_table_matches_the_pinned_division_timing() {
        let director = run().unwrap();
        let rows: Vec<_> = director.ctc.rows().collect();
        assert_eq!(rows.len(), 3);

        let mother = rows.iter().find(|r| r.id == 1).unwrap();
        assert_eq!((mother.first_frame, mother.last_frame, mother.parent_id), (0, 19, 0));

        let daughters: Vec<_> = rows.iter().filter(|r| r.id != 1).collect();
        assert_eq!(daughters.len(), 2);
        for d in daughters {
            assert_eq!(d.first_frame, 20);
            assert_eq!(d.parent_id, 1);
        }
    }
}
