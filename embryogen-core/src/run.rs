//! Wires `Transport`, `FrontOfficer` and `Director` into the full per-round
//! control flow: internal phase, AABB fence, external phase, second fence,
//! clock advance, and on export ticks a MAX-reduced render plus an optional
//! prompt gate. One OS thread per FrontOfficer for the run's lifetime,
//! matching the "one process per thread" scheduling model.

use crate::director::Director;
use crate::front_officer::{AgentPhase, FrontOfficer, RoundReport};
use crate::image_buffers::{FrameImages, MaskImage};
use crate::scene_controls::SceneControls;
use embryogen_concepts::agent::Agent as _;
use embryogen_concepts::errors::EmbryoGenError;
use std::sync::mpsc;

enum DirectorSignal {
    Continue { export: bool },
    Stop,
}

struct FoUpdate {
    report: RoundReport,
    live_ids: Vec<embryogen_concepts::agent::AgentId>,
    frame: Option<FrameImages>,
}

/// Renders one FrontOfficer's locally-owned nucleus agents into a mask
/// image; hinter agents carry no sphere body and are skipped. The phantom
/// and optics channels are left empty here since no scenario in this build
/// drives the fluorescence accumulator.
fn render_frame(fo: &FrontOfficer, scene: &SceneControls) -> FrameImages {
    let mask = if scene.mask_enabled {
        let mut img = MaskImage::new(scene.image_size_px());
        for agent in fo.agents.values() {
            let Some(nucleus) = agent.as_nucleus() else {
                continue;
            };
            let geom = nucleus.published_geometry();
            for i in 0..geom.no_of_spheres() {
                img.rasterize_sphere(
                    scene.img_res,
                    scene.scene_offset,
                    geom.centres[i],
                    geom.radii[i],
                    (agent.id() as u16).max(1),
                );
            }
        }
        Some(img)
    } else {
        None
    };
    FrameImages {
        mask,
        phantom: None,
        optics: None,
    }
}

fn fo_thread_body(
    mut fo: FrontOfficer,
    control_rx: mpsc::Receiver<DirectorSignal>,
    update_tx: mpsc::Sender<FoUpdate>,
    scene: SceneControls,
    incr_time: f32,
) -> Result<(), EmbryoGenError> {
    let mut t_future = scene.init_time;
    loop {
        match control_rx.recv() {
            Ok(DirectorSignal::Continue { export }) => {
                t_future += incr_time;
                fo.prepare_for_update_and_publish();
                fo.run_agents_phase(AgentPhase::AdvanceAndBuildIntForces, t_future)
                    .map_err(EmbryoGenError::Invariant)?;
                fo.run_agents_phase(AgentPhase::AdjustGeometryByIntForces, t_future)
                    .map_err(EmbryoGenError::Invariant)?;
                fo.run_agents_phase(AgentPhase::PublishGeometry, t_future)
                    .map_err(EmbryoGenError::Invariant)?;
                fo.refresh_shadow_snapshot();
                fo.exchange_aabb_of_agents();
                fo.wait_for_publish_agents_aabbs();

                fo.run_agents_phase(AgentPhase::CollectExtForces, t_future)
                    .map_err(EmbryoGenError::Invariant)?;
                fo.run_agents_phase(AgentPhase::AdjustGeometryByExtForces, t_future)
                    .map_err(EmbryoGenError::Invariant)?;
                fo.run_agents_phase(AgentPhase::PublishGeometry, t_future)
                    .map_err(EmbryoGenError::Invariant)?;
                fo.refresh_shadow_snapshot();

                fo.sync_dictionary_before_exchange();
                fo.postprocess_after_update().map_err(EmbryoGenError::Invariant)?;
                fo.barrier();
                fo.run_update_controls(t_future);

                let frame = if export {
                    Some(render_frame(&fo, &scene))
                } else {
                    None
                };
                let report = fo.drain_round_report();
                let live_ids = fo.live_agent_ids();
                if update_tx.send(FoUpdate { report, live_ids, frame }).is_err() {
                    break;
                }
            }
            Ok(DirectorSignal::Stop) | Err(_) => break,
        }
    }
    fo.shutdown();
    Ok(())
}

/// Drives `fos` to completion against `scene`'s clock, writing one TIFF per
/// export tick using `output_template` and, if configured, the CTC table at
/// the end. Returns the `Director` so callers can inspect final bookkeeping.
pub fn run_to_completion(
    scene: SceneControls,
    fos: Vec<FrontOfficer>,
) -> Result<Director, EmbryoGenError> {
    let mut director = Director::new(scene.clone());
    let n = fos.len();
    let mut control_txs = Vec::with_capacity(n);
    let mut update_rxs = Vec::with_capacity(n);
    let mut handles = Vec::with_capacity(n);

    for fo in fos {
        let (control_tx, control_rx) = mpsc::channel();
        let (update_tx, update_rx) = mpsc::channel();
        control_txs.push(control_tx);
        update_rxs.push(update_rx);
        let scene_clone = scene.clone();
        let incr_time = scene.incr_time;
        handles.push(std::thread::spawn(move || {
            fo_thread_body(fo, control_rx, update_tx, scene_clone, incr_time)
        }));
    }

    while !director.is_done() {
        // Checked against this round's pre-advance time/export count, per
        // spec §4.4's `currTime + Δt ≥ frameCnt·expoTime`.
        let export = director.is_export_tick();
        director.advance_clock();
        director.bump_frame_count();

        for tx in &control_txs {
            let _ = tx.send(DirectorSignal::Continue { export });
        }

        let mut reports = Vec::with_capacity(n);
        let mut frames = Vec::with_capacity(n);
        let mut live_ids = Vec::new();
        for rx in &update_rxs {
            let update = rx
                .recv()
                .map_err(|_| EmbryoGenError::Invariant(embryogen_concepts::errors::InvariantError::new(
                    "a FrontOfficer thread stopped reporting mid-run",
                )))?;
            reports.push(update.report);
            live_ids.extend(update.live_ids);
            if let Some(frame) = update.frame {
                frames.push(frame);
            }
        }
        director.absorb_round_reports(&reports);
        director.touch_all_live(live_ids.into_iter());

        if export && !frames.is_empty() {
            let export_index = director.export_count;
            let reduced = director.reduce_and_maybe_prompt(frames);
            director.bump_export_count();
            if let Some(mask) = &reduced.mask {
                let path = format_output_path(&scene.output_template, export_index);
                let _ = mask.write_tiff(std::path::Path::new(&path));
            }
        }
    }

    for tx in &control_txs {
        let _ = tx.send(DirectorSignal::Stop);
    }
    for handle in handles {
        let _ = handle.join();
    }

    director.write_ctc_table().map_err(EmbryoGenError::Io)?;
    Ok(director)
}

fn format_output_path(template: &str, export_index: u32) -> String {
    if template.contains("{}") {
        template.replacen("{}", &export_index.to_string(), 1)
    } else if let (Some(open), Some(close)) = (template.find('{'), template.find('}')) {
        let mut out = String::new();
        out.push_str(&template[..open]);
        out.push_str(&format!("{:03}", export_index));
        out.push_str(&template[close + 1..]);
        out
    } else {
        format!("{template}{export_index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;
    use embryogen_building_blocks::{NucleusAgent, NucleusVariant, PhysicsParameters};
    use embryogen_concepts::geometry::Spheres;
    use embryogen_concepts::vec3::Vec3;

    #[test]
    fn output_path_formats_frame_index() {
        let path = format_output_path("frame{:03}.tif", 7);
        assert_eq!(path, "frame007.tif");
    }

    #[test]
    fn one_agent_one_fo_runs_to_completion() {
        let mut scene = SceneControls::default();
        scene.init_time = 0.0;
        scene.incr_time = 0.1;
        scene.stop_time = 0.3;
        scene.expo_time = 0.5;
        scene.fo_count = 1;

        let transports = Transport::build(1);
        let mut fo = FrontOfficer::new(0, 1, transports.into_iter().next().unwrap());
        let id = fo.next_agent_id().unwrap();
        let shape = Spheres::new(vec![Vec3::zero()], vec![5.0]);
        let agent = NucleusAgent::new(
            id,
            "nucleus",
            NucleusVariant::Ns,
            shape,
            scene.init_time,
            scene.incr_time,
            PhysicsParameters::default(),
        );
        fo.start_new_agent(agent, 0);

        let director = run_to_completion(scene, vec![fo]).unwrap();
        assert_eq!(director.frame_count, 3);
    }
}
