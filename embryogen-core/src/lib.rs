//! The round driver: FrontOfficer and Director processes, the transport
//! fabric between them, volumetric export and the CTC track table.

pub mod ctc;
pub mod director;
pub mod display_unit;
pub mod front_officer;
pub mod image_buffers;
pub mod run;
pub mod scene_controls;
pub mod transport;

pub use ctc::{CtcTrackRow, CtcTrackTable};
pub use director::Director;
pub use display_unit::{
    first_id_for_agent_debug_objects, first_id_for_agent_objects, first_id_for_scene_debug_objects,
    Color, DisplayUnit, FileDisplayUnit, VoidDisplayUnit,
};
pub use front_officer::{AgentPhase, FrontOfficer, RoundReport};
pub use image_buffers::{FloatImage, FrameImages, MaskImage};
pub use scene_controls::SceneControls;
pub use transport::{ShadowRequest, ShadowSnapshot, Transport};
