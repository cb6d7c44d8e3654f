//! Stationary "hinter" agents: non-moving scalar- or vector-field agents
//! used to bias nuclei. Both implement the same five-phase contract as
//! `NucleusAgent`, but everything except the local clock is a no-op until
//! `publish_geometry`, matching the original `ShapeHinter`/`TrajectoriesHinter`
//! split between "internal/external force" phases (which they skip
//! entirely) and geometry publication.

use embryogen_concepts::agent::{Agent, AgentId, NeighbourLookup, ShadowAgent};
use embryogen_concepts::errors::CalcError;
use embryogen_concepts::geometry::{Geometry, ScalarImg, VectorImg};
use embryogen_concepts::vec3::Vec3;

use crate::track_record::TrackRecord;

/// A non-moving scalar-field agent (e.g. the yolk) that nuclei read through
/// `proximity_pairs_to_yolk`. Its geometry is fixed at construction time; it
/// never adjusts it in response to forces.
pub struct ShapeHinterAgent {
    id: AgentId,
    type_name: String,
    geometry: ScalarImg,
    curr_time: f32,
    incr_time: f32,
}

impl ShapeHinterAgent {
    pub fn new(
        id: AgentId,
        type_name: impl Into<String>,
        geometry: ScalarImg,
        curr_time: f32,
        incr_time: f32,
    ) -> Self {
        ShapeHinterAgent {
            id,
            type_name: type_name.into(),
            geometry,
            curr_time,
            incr_time,
        }
    }

    pub fn curr_time(&self) -> f32 {
        self.curr_time
    }
}

impl Agent for ShapeHinterAgent {
    fn advance_and_build_int_forces(&mut self, _future_global_time: f32) {
        self.curr_time += self.incr_time;
    }

    fn adjust_geometry_by_int_forces(&mut self) {}

    fn collect_ext_forces(&mut self, _lookup: &mut dyn NeighbourLookup) -> Result<(), CalcError> {
        Ok(())
    }

    fn adjust_geometry_by_ext_forces(&mut self) {}

    fn publish_geometry(&mut self) {}

    fn id(&self) -> AgentId {
        self.id
    }

    fn shadow(&self) -> ShadowAgent {
        ShadowAgent::new(
            self.id,
            self.type_name.clone(),
            Geometry::ScalarImg(self.geometry.clone()),
        )
    }
}

/// A non-moving vector-field agent driven by a [`TrackRecord`]: each round
/// it resamples the displacement every track underwent since the field was
/// last refreshed and republishes a `VectorImg` carrying that displacement,
/// which nearby nuclei read as a "hinter" force.
pub struct TrajectoriesHinterAgent {
    id: AgentId,
    type_name: String,
    tracks: TrackRecord,
    geometry: VectorImg,
    curr_time: f32,
    incr_time: f32,
    last_updated_time: f32,
}

impl TrajectoriesHinterAgent {
    pub fn new(
        id: AgentId,
        type_name: impl Into<String>,
        tracks: TrackRecord,
        template: VectorImg,
        curr_time: f32,
        incr_time: f32,
    ) -> Self {
        TrajectoriesHinterAgent {
            id,
            type_name: type_name.into(),
            tracks,
            geometry: template,
            curr_time,
            incr_time,
            last_updated_time: curr_time - incr_time,
        }
    }

    /// Resamples every grid voxel's vector as the displacement, between
    /// `last_updated_time` and `curr_time`, of whichever track passes
    /// nearest to that voxel. Voxels with no track data in range keep the
    /// zero vector.
    fn refresh_field(&mut self) {
        let res = self.geometry.res;
        let off = self.geometry.off;
        let size = self.geometry.size_px;
        let t0 = self.last_updated_time;
        let t1 = self.curr_time;

        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    let voxel_centre = Vec3::pixel_to_micron(Vec3::new(x, y, z), res, off);
                    let mut best: Option<(f32, Vec3<f32>)> = None;
                    for id in self.tracks.track_ids() {
                        let Some(p0) = self.tracks.position_at(*id, t0) else {
                            continue;
                        };
                        let Some(p1) = self.tracks.position_at(*id, t1) else {
                            continue;
                        };
                        let dist_sq = (p1 - voxel_centre).length_sq();
                        if best.map(|(bd, _)| dist_sq < bd).unwrap_or(true) {
                            best = Some((dist_sq, p1 - p0));
                        }
                    }
                    let idx = (z * size.y + y) * size.x + x;
                    let v = best.map(|(_, d)| d).unwrap_or(Vec3::zero());
                    self.geometry.vx[idx] = v.x;
                    self.geometry.vy[idx] = v.y;
                    self.geometry.vz[idx] = v.z;
                }
            }
        }
    }
}

impl Agent for TrajectoriesHinterAgent {
    fn advance_and_build_int_forces(&mut self, _future_global_time: f32) {
        self.curr_time += self.incr_time;
    }

    fn adjust_geometry_by_int_forces(&mut self) {}

    fn collect_ext_forces(&mut self, _lookup: &mut dyn NeighbourLookup) -> Result<(), CalcError> {
        Ok(())
    }

    fn adjust_geometry_by_ext_forces(&mut self) {}

    fn publish_geometry(&mut self) {
        if self.curr_time > self.last_updated_time {
            self.refresh_field();
            self.last_updated_time = self.curr_time;
            self.geometry.update_own_aabb();
        }
    }

    fn id(&self) -> AgentId {
        self.id
    }

    fn shadow(&self) -> ShadowAgent {
        ShadowAgent::new(
            self.id,
            self.type_name.clone(),
            Geometry::VectorImg(self.geometry.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embryogen_concepts::geometry::{ScalarImgModel, VectorImgPolicy};

    fn flat_scalar_img() -> ScalarImg {
        ScalarImg::new(
            ScalarImgModel::GradInGradOut,
            Vec3::splat(4usize),
            Vec3::splat(1.0_f32),
            Vec3::splat(0.0_f32),
            vec![1.0; 64],
        )
    }

    #[test]
    fn shape_hinter_never_moves_its_geometry() {
        let mut hinter = ShapeHinterAgent::new(1, "yolk", flat_scalar_img(), 0.0, 0.1);
        let v0 = hinter.shadow().version();
        hinter.advance_and_build_int_forces(0.1);
        hinter.adjust_geometry_by_int_forces();
        hinter.adjust_geometry_by_ext_forces();
        hinter.publish_geometry();
        assert_eq!(hinter.shadow().version(), v0);
        assert_eq!(hinter.curr_time(), 0.1);
    }

    #[test]
    fn trajectories_hinter_resamples_field_from_track_record() {
        let text = "0.0 0.0 0.0 0.0 1 0 0\n1.0 10.0 0.0 0.0 1 0 0\n";
        let tracks = TrackRecord::parse(text, Vec3::splat(1.0), 1.0, 0.0).unwrap();
        let template = VectorImg::new(
            VectorImgPolicy::MinVec,
            Vec3::splat(4usize),
            Vec3::splat(1.0_f32),
            Vec3::splat(0.0_f32),
            vec![0.0; 64],
            vec![0.0; 64],
            vec![0.0; 64],
        );
        let mut hinter = TrajectoriesHinterAgent::new(2, "tracks", tracks, template, 0.0, 1.0);
        hinter.advance_and_build_int_forces(1.0);
        hinter.publish_geometry();
        let shadow = hinter.shadow();
        if let Geometry::VectorImg(img) = &shadow.geometry {
            assert!(img.vx.iter().any(|&v| v.abs() > 1e-6));
        } else {
            panic!("expected VectorImg geometry");
        }
    }
}
