//! The shape kernel: tagged-union geometry representations and the single
//! `getDistance`-style proximity probe that every agent physics routine
//! reads, independent of which concrete shape a neighbour happens to use.

use crate::aabb::Aabb;
use crate::errors::CalcError;
use crate::vec3::Vec3;

/// Discriminant of a [`Geometry`] variant, kept distinct from the enum
/// itself because serialised AABBs/wire messages carry only the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeForm {
    Spheres = 0,
    Mesh = 1,
    ScalarImg = 2,
    VectorImg = 3,
}

/// Output of a distance probe between two geometries. The geometry on which
/// `get_distance` was called plays the role of "local"; its argument plays
/// "other".
#[derive(Clone, Copy, Debug)]
pub struct ProximityPair {
    pub local_pos: Vec3<f32>,
    pub other_pos: Vec3<f32>,
    /// Negative means the two points represent a collision pair of that
    /// penetration depth; positive is the distance between nearest points.
    pub distance: f32,
    pub local_hint: i64,
    pub other_hint: i64,
}

impl ProximityPair {
    pub fn new(local_pos: Vec3<f32>, other_pos: Vec3<f32>, distance: f32) -> Self {
        ProximityPair {
            local_pos,
            other_pos,
            distance,
            local_hint: 0,
            other_hint: 0,
        }
    }

    pub fn with_hints(
        local_pos: Vec3<f32>,
        other_pos: Vec3<f32>,
        distance: f32,
        local_hint: i64,
        other_hint: i64,
    ) -> Self {
        ProximityPair {
            local_pos,
            other_pos,
            distance,
            local_hint,
            other_hint,
        }
    }

    /// Exchanges the notion of "local" and "other".
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.local_pos, &mut self.other_pos);
        std::mem::swap(&mut self.local_hint, &mut self.other_hint);
    }
}

/// A union of balls: the body of most `NucleusAgent`s.
#[derive(Clone, Debug)]
pub struct Spheres {
    pub centres: Vec<Vec3<f32>>,
    pub radii: Vec<f32>,
    pub version: i32,
    pub aabb: Aabb,
}

impl Spheres {
    pub fn new(centres: Vec<Vec3<f32>>, radii: Vec<f32>) -> Self {
        assert_eq!(centres.len(), radii.len(), "centres/radii length mismatch");
        let mut s = Spheres {
            centres,
            radii,
            version: 0,
            aabb: Aabb::empty(),
        };
        s.update_own_aabb();
        s
    }

    pub fn no_of_spheres(&self) -> usize {
        self.centres.len()
    }

    pub fn update_own_aabb(&mut self) {
        let mut aabb = Aabb::empty();
        for (c, r) in self.centres.iter().zip(self.radii.iter()) {
            if *r > 0.0 {
                aabb.grow_sphere(*c, *r);
            }
        }
        self.aabb = aabb;
        self.version += 1;
    }
}

/// Distance-transform model carried by a [`ScalarImg`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarImgModel {
    /// distance 0 inside, positive outside.
    ZeroInGradOut,
    /// negative inside, positive outside; magnitude is distance to surface.
    GradInGradOut,
    /// negative inside, 0 outside.
    GradInZeroOut,
}

/// A 3D float image storing a signed distance transform against a binary
/// mask; a "hinter" geometry (e.g. yolk shape).
#[derive(Clone, Debug)]
pub struct ScalarImg {
    pub model: ScalarImgModel,
    pub size_px: Vec3<usize>,
    pub res: Vec3<f32>,
    pub off: Vec3<f32>,
    pub voxels: Vec<f32>,
    pub version: i32,
    pub aabb: Aabb,
}

impl ScalarImg {
    pub fn new(
        model: ScalarImgModel,
        size_px: Vec3<usize>,
        res: Vec3<f32>,
        off: Vec3<f32>,
        voxels: Vec<f32>,
    ) -> Self {
        assert_eq!(voxels.len(), size_px.x * size_px.y * size_px.z);
        let mut img = ScalarImg {
            model,
            size_px,
            res,
            off,
            voxels,
            version: 0,
            aabb: Aabb::empty(),
        };
        img.update_own_aabb();
        img
    }

    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.size_px.y + y) * self.size_px.x + x
    }

    pub fn at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.voxels[self.idx(x, y, z)]
    }

    pub fn voxel_diagonal(&self) -> f32 {
        Vec3::new(1.0 / self.res.x, 1.0 / self.res.y, 1.0 / self.res.z).length()
    }

    /// Central-difference gradient at an interior voxel, halved at image
    /// borders as the design prescribes.
    pub fn gradient_at(&self, x: usize, y: usize, z: usize) -> Vec3<f32> {
        let gx = if x == 0 {
            self.at(x + 1, y, z) - self.at(x, y, z)
        } else if x + 1 >= self.size_px.x {
            self.at(x, y, z) - self.at(x - 1, y, z)
        } else {
            (self.at(x + 1, y, z) - self.at(x - 1, y, z)) * 0.5
        };
        let gy = if y == 0 {
            self.at(x, y + 1, z) - self.at(x, y, z)
        } else if y + 1 >= self.size_px.y {
            self.at(x, y, z) - self.at(x, y - 1, z)
        } else {
            (self.at(x, y + 1, z) - self.at(x, y - 1, z)) * 0.5
        };
        let gz = if z == 0 {
            self.at(x, y, z + 1) - self.at(x, y, z)
        } else if z + 1 >= self.size_px.z {
            self.at(x, y, z) - self.at(x, y, z - 1)
        } else {
            (self.at(x, y, z + 1) - self.at(x, y, z - 1)) * 0.5
        };
        Vec3::new(gx, gy, gz) * (self.res.x) // anisotropic res collapsed to x for simplicity of units
    }

    pub fn update_own_aabb(&mut self) {
        match self.model {
            ScalarImgModel::GradInZeroOut => {
                let mut aabb = Aabb::empty();
                for z in 0..self.size_px.z {
                    for y in 0..self.size_px.y {
                        for x in 0..self.size_px.x {
                            if self.at(x, y, z) < 0.0 {
                                let p = Vec3::pixel_to_micron(
                                    Vec3::new(x, y, z),
                                    self.res,
                                    self.off,
                                );
                                aabb.grow(p);
                            }
                        }
                    }
                }
                self.aabb = aabb;
            }
            _ => {
                let min = self.off;
                let max = Vec3::pixel_to_micron(
                    Vec3::new(self.size_px.x, self.size_px.y, self.size_px.z),
                    self.res,
                    self.off,
                );
                let mut aabb = Aabb::empty();
                aabb.grow(min);
                aabb.grow(max);
                self.aabb = aabb;
            }
        }
        self.version += 1;
    }
}

/// How a [`VectorImg`] reduces multiple candidate voxels into the pairs it
/// emits in a distance query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorImgPolicy {
    MinVec,
    MaxVec,
    AvgVec,
    AllVec,
}

/// Three float images of equal geometry holding a 3D vector field; a
/// "hinter" geometry driven by e.g. a trajectory track.
#[derive(Clone, Debug)]
pub struct VectorImg {
    pub policy: VectorImgPolicy,
    pub size_px: Vec3<usize>,
    pub res: Vec3<f32>,
    pub off: Vec3<f32>,
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
    pub vz: Vec<f32>,
    pub version: i32,
    pub aabb: Aabb,
}

impl VectorImg {
    pub fn new(
        policy: VectorImgPolicy,
        size_px: Vec3<usize>,
        res: Vec3<f32>,
        off: Vec3<f32>,
        vx: Vec<f32>,
        vy: Vec<f32>,
        vz: Vec<f32>,
    ) -> Self {
        let n = size_px.x * size_px.y * size_px.z;
        assert_eq!(vx.len(), n);
        assert_eq!(vy.len(), n);
        assert_eq!(vz.len(), n);
        let mut img = VectorImg {
            policy,
            size_px,
            res,
            off,
            vx,
            vy,
            vz,
            version: 0,
            aabb: Aabb::empty(),
        };
        img.update_own_aabb();
        img
    }

    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.size_px.y + y) * self.size_px.x + x
    }

    pub fn vector_at(&self, x: usize, y: usize, z: usize) -> Vec3<f32> {
        let i = self.idx(x, y, z);
        Vec3::new(self.vx[i], self.vy[i], self.vz[i])
    }

    pub fn update_own_aabb(&mut self) {
        let min = self.off;
        let max = Vec3::pixel_to_micron(
            Vec3::new(self.size_px.x, self.size_px.y, self.size_px.z),
            self.res,
            self.off,
        );
        let mut aabb = Aabb::empty();
        aabb.grow(min);
        aabb.grow(max);
        self.aabb = aabb;
        self.version += 1;
    }
}

/// Placeholder shape form. The original system never completed a distance
/// routine for triangle meshes; the variant is kept so the tagged union
/// stays exhaustive, but every operation on it is a [`CalcError`].
#[derive(Clone, Debug, Default)]
pub struct Mesh;

/// The closed set of shape representations an agent's body (or a hinter)
/// may choose. Dispatch between two geometries is a single `match` on this
/// pair of tags, never per-voxel.
#[derive(Clone, Debug)]
pub enum Geometry {
    Spheres(Spheres),
    ScalarImg(ScalarImg),
    VectorImg(VectorImg),
    Mesh(Mesh),
}

impl Geometry {
    pub fn shape_form(&self) -> ShapeForm {
        match self {
            Geometry::Spheres(_) => ShapeForm::Spheres,
            Geometry::ScalarImg(_) => ShapeForm::ScalarImg,
            Geometry::VectorImg(_) => ShapeForm::VectorImg,
            Geometry::Mesh(_) => ShapeForm::Mesh,
        }
    }

    pub fn aabb(&self) -> Aabb {
        match self {
            Geometry::Spheres(s) => s.aabb,
            Geometry::ScalarImg(s) => s.aabb,
            Geometry::VectorImg(s) => s.aabb,
            Geometry::Mesh(_) => Aabb::empty(),
        }
    }

    pub fn version(&self) -> i32 {
        match self {
            Geometry::Spheres(s) => s.version,
            Geometry::ScalarImg(s) => s.version,
            Geometry::VectorImg(s) => s.version,
            Geometry::Mesh(_) => 0,
        }
    }

    pub fn update_own_aabb(&mut self) {
        match self {
            Geometry::Spheres(s) => s.update_own_aabb(),
            Geometry::ScalarImg(s) => s.update_own_aabb(),
            Geometry::VectorImg(s) => s.update_own_aabb(),
            Geometry::Mesh(_) => {}
        }
    }

    /// Appends zero or more [`ProximityPair`]s describing nearest-surface
    /// contacts between `self` ("local") and `other`.
    pub fn get_distance(
        &self,
        other: &Geometry,
        out: &mut Vec<ProximityPair>,
    ) -> Result<(), CalcError> {
        match (self, other) {
            (Geometry::Spheres(a), Geometry::Spheres(b)) => {
                spheres_vs_spheres(a, b, out);
                Ok(())
            }
            (Geometry::ScalarImg(a), Geometry::Spheres(b)) => {
                scalar_img_vs_spheres(a, b, out);
                Ok(())
            }
            (Geometry::Spheres(a), Geometry::ScalarImg(b)) => {
                let mut tmp = Vec::new();
                scalar_img_vs_spheres(b, a, &mut tmp);
                for mut p in tmp {
                    p.swap();
                    out.push(p);
                }
                Ok(())
            }
            (Geometry::VectorImg(a), Geometry::Spheres(b)) => {
                vector_img_vs_spheres(a, b, out);
                Ok(())
            }
            (Geometry::Spheres(a), Geometry::VectorImg(b)) => {
                let mut tmp = Vec::new();
                vector_img_vs_spheres(b, a, &mut tmp);
                for mut p in tmp {
                    p.swap();
                    out.push(p);
                }
                Ok(())
            }
            (Geometry::Mesh(_), _) | (_, Geometry::Mesh(_)) => Err(CalcError::new(
                "Mesh geometry carries no distance routine",
            )),
            _ => Err(CalcError::new(
                "unsupported geometry pair for get_distance",
            )),
        }
    }
}

fn spheres_vs_spheres(a: &Spheres, b: &Spheres, out: &mut Vec<ProximityPair>) {
    for i in 0..a.no_of_spheres() {
        let ri = a.radii[i];
        if ri <= 0.0 {
            continue;
        }
        let ci = a.centres[i];
        let mut best_j: Option<usize> = None;
        let mut best_d = f32::INFINITY;
        for j in 0..b.no_of_spheres() {
            let rj = b.radii[j];
            if rj <= 0.0 {
                continue;
            }
            let cj = b.centres[j];
            let d = (cj - ci).length() - (ri + rj);
            if d < best_d {
                best_d = d;
                best_j = Some(j);
            }
        }
        if let Some(j) = best_j {
            let cj = b.centres[j];
            let rj = b.radii[j];
            let h = ci.direction_to(&cj);
            let local_pos = ci + h * ri;
            let other_pos = cj - h * rj;
            out.push(ProximityPair::with_hints(
                local_pos, other_pos, best_d, i as i64, j as i64,
            ));
        }
    }
}

fn scalar_img_vs_spheres(img: &ScalarImg, spheres: &Spheres, out: &mut Vec<ProximityPair>) {
    if !img.aabb.intersects(&spheres.aabb) {
        return;
    }
    let (min_px, max_px) = img.aabb.export_in_pixel_coords(img.res, img.off, img.size_px);
    let voxel_half_diag = img.voxel_diagonal() / 2.0;

    for (k, (centre, radius)) in spheres.centres.iter().zip(spheres.radii.iter()).enumerate() {
        if *radius <= 0.0 {
            continue;
        }
        let mut best: Option<(usize, usize, usize, f32)> = None;
        for z in min_px.z..max_px.z {
            for y in min_px.y..max_px.y {
                for x in min_px.x..max_px.x {
                    let voxel_centre = Vec3::pixel_to_micron(Vec3::new(x, y, z), img.res, img.off);
                    let dist_to_surface = (voxel_centre - *centre).length() - radius;
                    if dist_to_surface.abs() >= voxel_half_diag {
                        continue;
                    }
                    let d = img.at(x, y, z);
                    if best.map(|(_, _, _, bd)| d < bd).unwrap_or(true) {
                        best = Some((x, y, z, d));
                    }
                }
            }
        }
        if let Some((x, y, z, d)) = best {
            let grad = img.gradient_at(x, y, z).normalize_or_zero() * (-d);
            let dir = (voxel_surface_point(centre, *radius, img, x, y, z) - *centre)
                .normalize_or_zero();
            let other_pos = *centre + dir * *radius;
            let local_pos = other_pos + grad;
            out.push(ProximityPair::with_hints(
                local_pos, other_pos, d, 0, k as i64,
            ));
        }
    }
}

fn voxel_surface_point(
    centre: &Vec3<f32>,
    _radius: f32,
    img: &ScalarImg,
    x: usize,
    y: usize,
    z: usize,
) -> Vec3<f32> {
    let _ = centre;
    Vec3::pixel_to_micron(Vec3::new(x, y, z), img.res, img.off)
}

fn vector_img_vs_spheres(img: &VectorImg, spheres: &Spheres, out: &mut Vec<ProximityPair>) {
    if !img.aabb.intersects(&spheres.aabb) {
        return;
    }
    let (min_px, max_px) = img.aabb.export_in_pixel_coords(img.res, img.off, img.size_px);
    let voxel_half_diag =
        Vec3::new(1.0 / img.res.x, 1.0 / img.res.y, 1.0 / img.res.z).length() / 2.0;

    for (k, (centre, radius)) in spheres.centres.iter().zip(spheres.radii.iter()).enumerate() {
        if *radius <= 0.0 {
            continue;
        }
        let mut candidates: Vec<(Vec3<f32>, Vec3<f32>)> = Vec::new();
        for z in min_px.z..max_px.z {
            for y in min_px.y..max_px.y {
                for x in min_px.x..max_px.x {
                    let voxel_centre = Vec3::pixel_to_micron(Vec3::new(x, y, z), img.res, img.off);
                    let dist_to_surface = (voxel_centre - *centre).length() - radius;
                    if dist_to_surface.abs() >= voxel_half_diag {
                        continue;
                    }
                    candidates.push((voxel_centre, img.vector_at(x, y, z)));
                }
            }
        }
        if candidates.is_empty() {
            continue;
        }
        match img.policy {
            VectorImgPolicy::MinVec | VectorImgPolicy::MaxVec => {
                let pick_max = img.policy == VectorImgPolicy::MaxVec;
                let mut best = candidates[0];
                let mut best_sq = best.1.length_sq();
                for cand in candidates.iter().skip(1) {
                    let sq = cand.1.length_sq();
                    if (pick_max && sq > best_sq) || (!pick_max && sq < best_sq) {
                        best = *cand;
                        best_sq = sq;
                    }
                }
                let (surface, v) = best;
                out.push(ProximityPair::with_hints(
                    surface + v,
                    surface,
                    v.length(),
                    0,
                    k as i64,
                ));
            }
            VectorImgPolicy::AvgVec => {
                let mut sum = Vec3::zero();
                for (_, v) in &candidates {
                    sum += *v;
                }
                let avg = sum / candidates.len() as f32;
                out.push(ProximityPair::with_hints(
                    *centre + avg,
                    *centre,
                    avg.length(),
                    0,
                    k as i64,
                ));
            }
            VectorImgPolicy::AllVec => {
                for (surface, v) in candidates {
                    out.push(ProximityPair::with_hints(
                        surface + v,
                        surface,
                        v.length(),
                        0,
                        k as i64,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_sphere(c: Vec3<f32>, r: f32) -> Spheres {
        Spheres::new(vec![c], vec![r])
    }

    #[test]
    fn spheres_distance_zero_radius_emits_nothing() {
        let a = one_sphere(Vec3::zero(), 0.0);
        let b = one_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0);
        let mut out = Vec::new();
        Geometry::Spheres(a)
            .get_distance(&Geometry::Spheres(b), &mut out)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn spheres_distance_matches_positions() {
        let a = one_sphere(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let b = one_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0);
        let mut out = Vec::new();
        Geometry::Spheres(a)
            .get_distance(&Geometry::Spheres(b), &mut out)
            .unwrap();
        assert_eq!(out.len(), 1);
        let pair = out[0];
        assert!((pair.distance - 3.0).abs() < 1e-4);
        assert!((pair.local_pos - pair.other_pos).length() - pair.distance.abs() < 1e-3);
    }

    #[test]
    fn mesh_distance_is_an_error() {
        let mut out = Vec::new();
        let err = Geometry::Mesh(Mesh)
            .get_distance(&Geometry::Spheres(one_sphere(Vec3::zero(), 1.0)), &mut out)
            .unwrap_err();
        assert!(err.message.contains("Mesh"));
    }

    #[test]
    fn scalar_vs_spheres_is_symmetric_within_one_voxel() {
        let res = Vec3::splat(2.0_f32);
        let off = Vec3::new(-5.0_f32, -5.0, -5.0);
        let size = Vec3::splat(20usize);
        let mut voxels = vec![0.0f32; 20 * 20 * 20];
        for z in 0..20 {
            for y in 0..20 {
                for x in 0..20 {
                    let p = Vec3::pixel_to_micron(Vec3::new(x, y, z), res, off);
                    let d = p.length() - 3.0; // sphere-like mask radius 3um at origin
                    voxels[(z * 20 + y) * 20 + x] = d;
                }
            }
        }
        let img = ScalarImg::new(ScalarImgModel::GradInGradOut, size, res, off, voxels);
        let s = one_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0);

        let mut ab = Vec::new();
        Geometry::ScalarImg(img.clone())
            .get_distance(&Geometry::Spheres(s.clone()), &mut ab)
            .unwrap();
        let mut ba = Vec::new();
        Geometry::Spheres(s)
            .get_distance(&Geometry::ScalarImg(img), &mut ba)
            .unwrap();
        assert_eq!(ab.len(), ba.len());
        if !ab.is_empty() {
            assert!((ab[0].distance - ba[0].distance).abs() < 1.0);
        }
    }
}
