use crate::vec3::Vec3;

/// Coordinate value placed way outside of any plausible scene, in micrometres.
pub const TOOFAR: f32 = 999_999_999.0;

/// Axis-aligned bounding box in micrometre space, used as the cheap
/// broad-phase approximation of an agent's detailed geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_corner: Vec3<f32>,
    pub max_corner: Vec3<f32>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// An AABB ready to be grown by repeated `include`/`grow` calls.
    pub fn empty() -> Self {
        Aabb {
            min_corner: Vec3::splat(TOOFAR),
            max_corner: Vec3::splat(-TOOFAR),
        }
    }

    pub fn reset(&mut self) {
        *self = Aabb::empty();
    }

    pub fn grow(&mut self, point: Vec3<f32>) {
        self.min_corner.x = self.min_corner.x.min(point.x);
        self.min_corner.y = self.min_corner.y.min(point.y);
        self.min_corner.z = self.min_corner.z.min(point.z);
        self.max_corner.x = self.max_corner.x.max(point.x);
        self.max_corner.y = self.max_corner.y.max(point.y);
        self.max_corner.z = self.max_corner.z.max(point.z);
    }

    pub fn grow_sphere(&mut self, centre: Vec3<f32>, radius: f32) {
        self.grow(centre - Vec3::splat(radius));
        self.grow(centre + Vec3::splat(radius));
    }

    /// Squared shortest per-axis gap between this AABB and `other`, clipped
    /// to zero whenever the two boxes intersect (or touch) along that axis.
    pub fn min_distance_sq(&self, other: &Aabb) -> f32 {
        let gap = |a_min: f32, a_max: f32, b_min: f32, b_max: f32| -> f32 {
            if a_max < b_min {
                b_min - a_max
            } else if b_max < a_min {
                a_min - b_max
            } else {
                0.0
            }
        };
        let dx = gap(
            self.min_corner.x,
            self.max_corner.x,
            other.min_corner.x,
            other.max_corner.x,
        );
        let dy = gap(
            self.min_corner.y,
            self.max_corner.y,
            other.min_corner.y,
            other.max_corner.y,
        );
        let dz = gap(
            self.min_corner.z,
            self.max_corner.z,
            other.min_corner.z,
            other.max_corner.z,
        );
        dx * dx + dy * dy + dz * dz
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min_distance_sq(other) == 0.0
    }

    /// Exports this AABB as a pixel-space sweep range `[min_px, max_px)`,
    /// clipped to `image_size_px` so callers can sweep safely with a plain
    /// `for` loop even when the AABB extends outside the image.
    pub fn export_in_pixel_coords(
        &self,
        res: Vec3<f32>,
        off: Vec3<f32>,
        image_size_px: Vec3<usize>,
    ) -> (Vec3<usize>, Vec3<usize>) {
        let clip = |v: i64, limit: usize| -> usize {
            if v < 0 {
                0
            } else if v as usize > limit {
                limit
            } else {
                v as usize
            }
        };
        let min_raw = self.min_corner.micron_to_pixel(res, off);
        let max_raw = self.max_corner.micron_to_pixel(res, off);
        let min_px = Vec3::new(
            clip(min_raw.x, image_size_px.x),
            clip(min_raw.y, image_size_px.y),
            clip(min_raw.z, image_size_px.z),
        );
        let max_px = Vec3::new(
            clip(max_raw.x + 1, image_size_px.x),
            clip(max_raw.y + 1, image_size_px.y),
            clip(max_raw.z + 1, image_size_px.z),
        );
        (min_px, max_px)
    }
}

/// An AABB tagged with the owning agent's id and hashed type id, broadcast
/// in bulk to every FrontOfficer once per round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NamedAabb {
    pub aabb: Aabb,
    pub agent_id: i32,
    pub agent_type_id: u64,
}

impl NamedAabb {
    pub fn new(aabb: Aabb, agent_id: i32, agent_type_id: u64) -> Self {
        NamedAabb {
            aabb,
            agent_id,
            agent_type_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_distance_sq_zero_iff_intersecting() {
        let mut a = Aabb::empty();
        a.grow(Vec3::new(0.0, 0.0, 0.0));
        a.grow(Vec3::new(1.0, 1.0, 1.0));
        let mut b = Aabb::empty();
        b.grow(Vec3::new(0.5, 0.5, 0.5));
        b.grow(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(a.min_distance_sq(&b), 0.0);
        assert!(a.intersects(&b));

        let mut c = Aabb::empty();
        c.grow(Vec3::new(5.0, 5.0, 5.0));
        c.grow(Vec3::new(6.0, 6.0, 6.0));
        assert!(a.min_distance_sq(&c) > 0.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn pixel_export_clips_to_image_bounds() {
        let mut a = Aabb::empty();
        a.grow(Vec3::new(-5.0, -5.0, -5.0));
        a.grow(Vec3::new(5.0, 5.0, 5.0));
        let res = Vec3::splat(1.0_f32);
        let off = Vec3::splat(0.0_f32);
        let (min_px, max_px) = a.export_in_pixel_coords(res, off, Vec3::splat(10usize));
        assert!(min_px.x <= max_px.x);
        assert!(min_px.y <= max_px.y);
        assert!(min_px.z <= max_px.z);
        assert!(max_px.x <= 10);
    }
}
