use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// A three-component vector used throughout the scene in either micrometre,
/// pixel or signed-voxel-offset space, depending on `T`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vec3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Vec3 { x, y, z }
    }
}

impl<T: Copy> Vec3<T> {
    pub fn splat(v: T) -> Self {
        Vec3 { x: v, y: v, z: v }
    }
}

impl<T: Copy + Mul<Output = T> + Add<Output = T>> Vec3<T> {
    pub fn dot(&self, other: &Vec3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl<T: Copy + Mul<Output = T> + Sub<Output = T>> Vec3<T> {
    pub fn cross(&self, other: &Vec3<T>) -> Vec3<T> {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl Vec3<f32> {
    pub fn zero() -> Self {
        Vec3::splat(0.0)
    }

    pub fn length_sq(&self) -> f32 {
        self.dot(self)
    }

    pub fn length(&self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Unit vector in the direction of `self`, or the zero vector if `self`
    /// is (numerically) the zero vector. The explicit API named by the
    /// error-handling design for the "numerical degenerate" error kind.
    pub fn normalize_or_zero(&self) -> Vec3<f32> {
        let len = self.length();
        if len < 1e-6 {
            Vec3::zero()
        } else {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        }
    }

    pub fn direction_to(&self, other: &Vec3<f32>) -> Vec3<f32> {
        (*other - *self).normalize_or_zero()
    }

    /// Converts a pixel-space coordinate to micrometre space, taking the
    /// *centre* of the voxel: `(px + 0.5) / res + off`.
    pub fn pixel_to_micron(px: Vec3<usize>, res: Vec3<f32>, off: Vec3<f32>) -> Vec3<f32> {
        Vec3::new(
            (px.x as f32 + 0.5) / res.x + off.x,
            (px.y as f32 + 0.5) / res.y + off.y,
            (px.z as f32 + 0.5) / res.z + off.z,
        )
    }

    /// Converts this micrometre-space point to pixel space, taking the
    /// floor after removing the offset and scaling by the resolution.
    pub fn micron_to_pixel(&self, res: Vec3<f32>, off: Vec3<f32>) -> Vec3<i64> {
        Vec3::new(
            ((self.x - off.x) * res.x).floor() as i64,
            ((self.y - off.y) * res.y).floor() as i64,
            ((self.z - off.z) * res.z).floor() as i64,
        )
    }
}

impl Add for Vec3<f32> {
    type Output = Vec3<f32>;
    fn add(self, rhs: Vec3<f32>) -> Vec3<f32> {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3<f32> {
    type Output = Vec3<f32>;
    fn sub(self, rhs: Vec3<f32>) -> Vec3<f32> {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl AddAssign for Vec3<f32> {
    fn add_assign(&mut self, rhs: Vec3<f32>) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vec3<f32> {
    fn sub_assign(&mut self, rhs: Vec3<f32>) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3<f32> {
    type Output = Vec3<f32>;
    fn mul(self, rhs: f32) -> Vec3<f32> {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3<f32> {
    type Output = Vec3<f32>;
    fn div(self, rhs: f32) -> Vec3<f32> {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl From<Vec3<usize>> for Vec3<f32> {
    fn from(v: Vec3<usize>) -> Self {
        Vec3::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl From<Vec3<i64>> for Vec3<f32> {
    fn from(v: Vec3<i64>) -> Self {
        Vec3::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_micron_roundtrip_within_one_voxel() {
        let res = Vec3::new(2.0_f32, 2.0, 2.0);
        let off = Vec3::new(-10.0_f32, -10.0, -10.0);
        for px in [(0usize, 0usize, 0usize), (3, 7, 12), (50, 1, 9)] {
            let p = Vec3::new(px.0, px.1, px.2);
            let um = Vec3::pixel_to_micron(p, res, off);
            let back = um.micron_to_pixel(res, off);
            assert_eq!(back.x, px.0 as i64);
            assert_eq!(back.y, px.1 as i64);
            assert_eq!(back.z, px.2 as i64);
        }
    }

    #[test]
    fn normalize_or_zero_handles_degenerate_vector() {
        let v = Vec3::zero();
        assert_eq!(v.normalize_or_zero(), Vec3::zero());
        let u = Vec3::new(3.0_f32, 0.0, 4.0);
        let n = u.normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dot_and_cross() {
        let a = Vec3::new(1.0_f32, 0.0, 0.0);
        let b = Vec3::new(0.0_f32, 1.0, 0.0);
        assert_eq!(a.dot(&b), 0.0);
        assert_eq!(a.cross(&b), Vec3::new(0.0, 0.0, 1.0));
    }
}
