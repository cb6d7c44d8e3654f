//! The configuration surface a scenario hands to the round driver: scene
//! geometry, timing, output toggles and file-name templates. Plain data,
//! no runtime singleton — matches the "no global mutable state" design
//! note.

use embryogen_concepts::vec3::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneControls {
    pub scene_offset: Vec3<f32>,
    pub scene_size: Vec3<f32>,
    pub img_res: Vec3<f32>,

    pub init_time: f32,
    pub incr_time: f32,
    pub stop_time: f32,
    pub expo_time: f32,

    /// `fmt`-style template with exactly one integer slot for the frame
    /// counter, e.g. `"frame{:03}.tif"`.
    pub output_template: String,
    pub ctc_track_file: Option<String>,

    pub mask_enabled: bool,
    pub phantom_enabled: bool,
    pub optics_enabled: bool,

    /// Blocks on stdin before letting the next round start, holding all
    /// FrontOfficers at the post-render barrier.
    pub prompt_user: bool,

    pub fo_count: usize,
}

impl SceneControls {
    pub fn image_size_px(&self) -> Vec3<usize> {
        Vec3::new(
            (self.scene_size.x * self.img_res.x).round() as usize,
            (self.scene_size.y * self.img_res.y).round() as usize,
            (self.scene_size.z * self.img_res.z).round() as usize,
        )
    }

    /// Whether `t + incr_time` crosses the next export-tick boundary.
    /// `export_count` is the number of frames *already exported*
    /// (`frameCnt` in spec §4.4), not the round index — a scenario with
    /// `expoTime > incrTime` exports far fewer frames than it runs rounds.
    pub fn is_export_tick(&self, t: f32, export_count: u32) -> bool {
        t + self.incr_time + 1e-5 >= export_count as f32 * self.expo_time
    }

    pub fn round_count(&self) -> u32 {
        (((self.stop_time - self.init_time) / self.incr_time).ceil()).max(0.0) as u32
    }
}

impl Default for SceneControls {
    fn default() -> Self {
        SceneControls {
            scene_offset: Vec3::splat(0.0),
            scene_size: Vec3::new(200.0, 200.0, 100.0),
            img_res: Vec3::splat(2.0),
            init_time: 0.0,
            incr_time: 0.1,
            stop_time: 1.0,
            expo_time: 0.5,
            output_template: "frame{:03}.tif".to_string(),
            ctc_track_file: None,
            mask_enabled: true,
            phantom_enabled: false,
            optics_enabled: false,
            prompt_user: false,
            fo_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_tick_detection_matches_one_agent_scenario() {
        let controls = SceneControls {
            init_time: 0.0,
            incr_time: 0.1,
            stop_time: 1.6,
            expo_time: 0.5,
            ..Default::default()
        };
        assert!(controls.is_export_tick(0.0, 0));
        assert!(!controls.is_export_tick(0.1, 1));
        assert!(controls.is_export_tick(0.4, 1));
    }

    #[test]
    fn round_count_matches_spec_example() {
        let controls = SceneControls {
            init_time: 0.0,
            incr_time: 0.1,
            stop_time: 1.6,
            ..Default::default()
        };
        assert_eq!(controls.round_count(), 16);
    }
}
