//! Per-tick volumetric outputs: the instance mask, the fluorescence
//! phantom accumulator and the optional optics map, plus the element-wise
//! MAX reduction the Director performs across FrontOfficers and the TIFF
//! writer.

use embryogen_concepts::vec3::Vec3;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tiff::encoder::{colortype, TiffEncoder};
use tracing::warn;

#[derive(Clone, Debug)]
pub struct MaskImage {
    pub size_px: Vec3<usize>,
    pub voxels: Vec<u16>,
}

impl MaskImage {
    pub fn new(size_px: Vec3<usize>) -> Self {
        MaskImage {
            size_px,
            voxels: vec![0u16; size_px.x * size_px.y * size_px.z],
        }
    }

    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.size_px.y + y) * self.size_px.x + x
    }

    /// Draws `agent_id` into every voxel inside the sphere. Never silently
    /// overwrites a non-zero, non-self voxel; logs the collision instead.
    pub fn rasterize_sphere(
        &mut self,
        res: Vec3<f32>,
        off: Vec3<f32>,
        centre: Vec3<f32>,
        radius: f32,
        agent_id: u16,
    ) {
        if radius <= 0.0 || agent_id == 0 {
            return;
        }
        let min_corner = centre - Vec3::splat(radius);
        let max_corner = centre + Vec3::splat(radius);
        let min_px = min_corner.micron_to_pixel(res, off);
        let max_px = max_corner.micron_to_pixel(res, off);
        let clip = |v: i64, limit: usize| -> usize {
            v.clamp(0, limit as i64) as usize
        };
        let x0 = clip(min_px.x, self.size_px.x);
        let x1 = clip(max_px.x + 1, self.size_px.x);
        let y0 = clip(min_px.y, self.size_px.y);
        let y1 = clip(max_px.y + 1, self.size_px.y);
        let z0 = clip(min_px.z, self.size_px.z);
        let z1 = clip(max_px.z + 1, self.size_px.z);

        for z in z0..z1 {
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = Vec3::pixel_to_micron(Vec3::new(x, y, z), res, off);
                    if (p - centre).length() <= radius {
                        let i = self.idx(x, y, z);
                        let existing = self.voxels[i];
                        if existing != 0 && existing != agent_id {
                            warn!(
                                x, y, z, existing, incoming = agent_id,
                                "mask rasterization collision between two agents"
                            );
                        } else {
                            self.voxels[i] = agent_id;
                        }
                    }
                }
            }
        }
    }

    /// Element-wise MAX reduction across per-FO mask images.
    pub fn reduce_max(images: &[MaskImage]) -> Option<MaskImage> {
        let first = images.first()?;
        let mut out = MaskImage::new(first.size_px);
        for img in images {
            for (o, v) in out.voxels.iter_mut().zip(img.voxels.iter()) {
                *o = (*o).max(*v);
            }
        }
        Some(out)
    }

    pub fn write_tiff(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut encoder = TiffEncoder::new(BufWriter::new(file))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        encoder
            .write_image::<colortype::Gray16>(
                self.size_px.x as u32,
                self.size_px.y as u32 * self.size_px.z as u32,
                &self.voxels,
            )
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

#[derive(Clone, Debug)]
pub struct FloatImage {
    pub size_px: Vec3<usize>,
    pub voxels: Vec<f32>,
}

impl FloatImage {
    pub fn new(size_px: Vec3<usize>) -> Self {
        FloatImage {
            size_px,
            voxels: vec![0.0f32; size_px.x * size_px.y * size_px.z],
        }
    }

    pub fn reduce_max(images: &[FloatImage]) -> Option<FloatImage> {
        let first = images.first()?;
        let mut out = FloatImage::new(first.size_px);
        for img in images {
            for (o, v) in out.voxels.iter_mut().zip(img.voxels.iter()) {
                *o = o.max(*v);
            }
        }
        Some(out)
    }
}

/// The three per-tick volumetric outputs a single export produces.
#[derive(Clone, Debug)]
pub struct FrameImages {
    pub mask: Option<MaskImage>,
    pub phantom: Option<FloatImage>,
    pub optics: Option<FloatImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterized_sphere_covers_its_centre_and_nothing_far_away() {
        let res = Vec3::splat(2.0_f32);
        let off = Vec3::splat(-50.0_f32);
        let mut mask = MaskImage::new(Vec3::splat(100usize));
        mask.rasterize_sphere(res, off, Vec3::zero(), 20.0, 1);

        let centre_px = Vec3::zero().micron_to_pixel(res, off);
        let i = mask.idx(centre_px.x as usize, centre_px.y as usize, centre_px.z as usize);
        assert_eq!(mask.voxels[i], 1);

        let far_px = Vec3::new(90usize, 50, 50);
        let j = mask.idx(far_px.x, far_px.y, far_px.z);
        assert_eq!(mask.voxels[j], 0);
    }

    #[test]
    fn reduce_max_combines_per_fo_images() {
        let mut a = MaskImage::new(Vec3::splat(4usize));
        let mut b = MaskImage::new(Vec3::splat(4usize));
        a.voxels[0] = 3;
        b.voxels[0] = 7;
        let reduced = MaskImage::reduce_max(&[a, b]).unwrap();
        assert_eq!(reduced.voxels[0], 7);
    }
}
