//! The coordinator: owns the global clock and the export-tick decision,
//! keeps the Cell Tracking Challenge table, and gates the round loop behind
//! a user prompt on export ticks. Holds no agents of its own.

use crate::ctc::CtcTrackTable;
use crate::front_officer::RoundReport;
use crate::image_buffers::{FloatImage, FrameImages, MaskImage};
use crate::scene_controls::SceneControls;
use embryogen_concepts::agent::AgentId;
use std::io::Write;

pub struct Director {
    pub scene: SceneControls,
    pub curr_time: f32,
    /// Round index, advanced every round; what the CTC table's
    /// `fromFrame`/`toFrame` columns are keyed on.
    pub frame_count: u32,
    /// Count of frames actually exported so far (spec §4.4 `frameCnt`),
    /// distinct from `frame_count`: most rounds are not export ticks.
    pub export_count: u32,
    pub ctc: CtcTrackTable,
}

impl Director {
    pub fn new(scene: SceneControls) -> Self {
        let curr_time = scene.init_time;
        Director {
            scene,
            curr_time,
            frame_count: 0,
            export_count: 0,
            ctc: CtcTrackTable::new(),
        }
    }

    /// Folds one round's worth of per-FO birth/death reports into the CTC
    /// table. Daughters born this round are recorded but their track does
    /// not start until `frame_count` reflects the round they actually begin
    /// in (callers decide that by when they invoke this).
    pub fn absorb_round_reports(&mut self, reports: &[RoundReport]) {
        for report in reports {
            for &(id, parent_id) in &report.started_agents {
                self.ctc.start(id, self.frame_count, parent_id);
            }
            for &id in &report.closed_agents {
                self.ctc.close(id, self.frame_count);
            }
        }
    }

    pub fn touch_all_live(&mut self, live_ids: impl Iterator<Item = AgentId>) {
        for id in live_ids {
            self.ctc.touch(id, self.frame_count);
        }
    }

    pub fn advance_clock(&mut self) {
        self.curr_time += self.scene.incr_time;
    }

    /// Must be called with `curr_time` still holding *this* round's
    /// pre-advance time (i.e. before `advance_clock`), matching spec
    /// §4.4's `currTime + Δt ≥ frameCnt·expoTime`.
    pub fn is_export_tick(&self) -> bool {
        self.scene.is_export_tick(self.curr_time, self.export_count)
    }

    pub fn is_done(&self) -> bool {
        self.curr_time >= self.scene.stop_time
    }

    pub fn bump_frame_count(&mut self) {
        self.frame_count += 1;
    }

    pub fn bump_export_count(&mut self) {
        self.export_count += 1;
    }

    /// MAX-reduces one frame's worth of per-FO volumetric outputs and, if a
    /// prompt gate is configured, blocks on stdin before the round loop may
    /// continue past this export tick.
    pub fn reduce_and_maybe_prompt(&self, per_fo: Vec<FrameImages>) -> FrameImages {
        let masks: Vec<MaskImage> = per_fo.iter().filter_map(|f| f.mask.clone()).collect();
        let phantoms: Vec<FloatImage> = per_fo.iter().filter_map(|f| f.phantom.clone()).collect();
        let optics: Vec<FloatImage> = per_fo.iter().filter_map(|f| f.optics.clone()).collect();

        let reduced = FrameImages {
            mask: MaskImage::reduce_max(&masks),
            phantom: FloatImage::reduce_max(&phantoms),
            optics: FloatImage::reduce_max(&optics),
        };

        if self.scene.prompt_user {
            print!("frame {} ready, press enter to continue> ", self.frame_count);
            let _ = std::io::stdout().flush();
            let mut discard = String::new();
            let _ = std::io::stdin().read_line(&mut discard);
        }

        reduced
    }

    pub fn write_ctc_table(&self) -> Result<(), embryogen_concepts::errors::IoError> {
        let Some(path) = &self.scene.ctc_track_file else {
            return Ok(());
        };
        self.ctc.write_to_file(std::path::Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorbing_reports_starts_and_closes_tracks() {
        let mut director = Director::new(SceneControls::default());
        director.frame_count = 5;
        let reports = vec![RoundReport {
            started_agents: vec![(2, 1), (3, 1)],
            closed_agents: vec![1],
        }];
        director.absorb_round_reports(&reports);
        let rows: Vec<_> = director.ctc.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.parent_id == 1));
    }

    #[test]
    fn export_ticks_track_an_independent_counter_from_round_count() {
        // spec scenario 1: oneAgent, stopTime 1.6, incrTime 0.1, expoTime
        // 0.5 -> 16 rounds, export ticks at t=0.1,0.5,1.0,1.5 (4, matching
        // the "plus 1.5" variant the spec calls out for expoTime = 0.5).
        let mut scene = SceneControls::default();
        scene.init_time = 0.0;
        scene.incr_time = 0.1;
        scene.stop_time = 1.6;
        scene.expo_time = 0.5;
        let mut director = Director::new(scene);
        let mut rounds = 0;
        let mut export_ticks = Vec::new();
        while !director.is_done() {
            let export = director.is_export_tick();
            director.advance_clock();
            director.bump_frame_count();
            rounds += 1;
            if export {
                export_ticks.push(director.curr_time);
                director.bump_export_count();
            }
        }
        assert_eq!(rounds, 16);
        assert_eq!(export_ticks.len(), 4);
        assert_eq!(director.export_count, 4);
        for (got, want) in export_ticks.iter().zip([0.1, 0.5, 1.0, 1.5]) {
            assert!((got - want).abs() < 1e-4);
        }
    }

    #[test]
    fn clock_reaches_stop_time_after_the_expected_number_of_rounds() {
        let mut scene = SceneControls::default();
        scene.init_time = 0.0;
        scene.incr_time = 0.1;
        scene.stop_time = 1.6;
        let mut director = Director::new(scene);
        let mut rounds = 0;
        while !director.is_done() {
            director.advance_clock();
            rounds += 1;
        }
        assert_eq!(rounds, 16);
    }
}
