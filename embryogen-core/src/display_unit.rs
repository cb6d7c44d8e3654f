//! The observer interface: an opaque sink for immediate draw calls, plus
//! the layered-ID helpers back-ends rely on to recover which agent (and
//! whether it was a debug object) produced a given draw call.

use embryogen_concepts::vec3::Vec3;

/// Layered draw-call identifier: bit 31 is reserved (always 0), bits
/// 30..=17 carry the agent id (14 bits), bit 16 is the debug flag, and
/// bits 15..=0 are a per-agent element index.
pub fn first_id_for_agent_objects(agent_id: i32) -> u32 {
    ((agent_id as u32) & 0x3FFF) << 17
}

pub fn first_id_for_agent_debug_objects(agent_id: i32) -> u32 {
    first_id_for_agent_objects(agent_id) | (1 << 16)
}

pub fn first_id_for_scene_debug_objects() -> u32 {
    (0x3FFFu32 << 17) | (1 << 16)
}

#[derive(Clone, Copy, Debug)]
pub enum Color {
    White,
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
}

/// Back-ends (file log, socket, gRPC) are interchangeable behind this
/// trait; the core only ever calls these four draw primitives plus the
/// two lifecycle calls.
pub trait DisplayUnit {
    fn draw_point(&mut self, id: u32, pos: Vec3<f32>, color: Color);
    fn draw_line(&mut self, id: u32, a: Vec3<f32>, b: Vec3<f32>, color: Color);
    fn draw_vector(&mut self, id: u32, base: Vec3<f32>, vector: Vec3<f32>, color: Color);
    fn draw_triangle(&mut self, id: u32, a: Vec3<f32>, b: Vec3<f32>, c: Vec3<f32>, color: Color);
    fn flush(&mut self);
    fn tick(&mut self, msg: &str);
}

/// Discards every call; used when a scenario has no observer attached.
#[derive(Default)]
pub struct VoidDisplayUnit;

impl DisplayUnit for VoidDisplayUnit {
    fn draw_point(&mut self, _id: u32, _pos: Vec3<f32>, _color: Color) {}
    fn draw_line(&mut self, _id: u32, _a: Vec3<f32>, _b: Vec3<f32>, _color: Color) {}
    fn draw_vector(&mut self, _id: u32, _base: Vec3<f32>, _vector: Vec3<f32>, _color: Color) {}
    fn draw_triangle(
        &mut self,
        _id: u32,
        _a: Vec3<f32>,
        _b: Vec3<f32>,
        _c: Vec3<f32>,
        _color: Color,
    ) {
    }
    fn flush(&mut self) {}
    fn tick(&mut self, _msg: &str) {}
}

/// Appends a human-readable line per draw call to an in-memory log; used by
/// scenarios and tests that want a record without a real back-end.
#[derive(Default)]
pub struct FileDisplayUnit {
    pub lines: Vec<String>,
}

impl DisplayUnit for FileDisplayUnit {
    fn draw_point(&mut self, id: u32, pos: Vec3<f32>, color: Color) {
        self.lines
            .push(format!("POINT {id} {:?} {color:?}", pos));
    }

    fn draw_line(&mut self, id: u32, a: Vec3<f32>, b: Vec3<f32>, color: Color) {
        self.lines
            .push(format!("LINE {id} {:?} {:?} {color:?}", a, b));
    }

    fn draw_vector(&mut self, id: u32, base: Vec3<f32>, vector: Vec3<f32>, color: Color) {
        self.lines
            .push(format!("VECTOR {id} {:?} {:?} {color:?}", base, vector));
    }

    fn draw_triangle(&mut self, id: u32, a: Vec3<f32>, b: Vec3<f32>, c: Vec3<f32>, color: Color) {
        self.lines
            .push(format!("TRIANGLE {id} {:?} {:?} {:?} {color:?}", a, b, c));
    }

    fn flush(&mut self) {
        self.lines.push("FLUSH".to_string());
    }

    fn tick(&mut self, msg: &str) {
        self.lines.push(format!("TICK {msg}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_ids_separate_agent_and_debug_flag() {
        let a = first_id_for_agent_objects(5);
        let d = first_id_for_agent_debug_objects(5);
        assert_ne!(a, d);
        assert_eq!(a >> 31, 0);
        assert_eq!((d >> 16) & 1, 1);
        assert_eq!((a >> 16) & 1, 0);
    }
}
