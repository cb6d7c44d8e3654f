//! The nucleus agent: the live, physically simulated representative of a
//! cell nucleus. Implements the fixed five-phase per-round contract over a
//! union-of-spheres body.

use embryogen_concepts::agent::{Agent, AgentId, NeighbourLookup, ShadowAgent};
use embryogen_concepts::errors::CalcError;
use embryogen_concepts::force::{ForceName, ForceVector};
use embryogen_concepts::geometry::{Geometry, ProximityPair, ShapeForm, Spheres};
use embryogen_concepts::vec3::Vec3;

use crate::physics_params::PhysicsParameters;

/// Which sphere topology a nucleus uses for its internal shape-restoring
/// force: the general "NS" case restores every pair's canonical distance,
/// the "4S" case restores only the four ordered neighbours of a polyline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NucleusVariant {
    Ns,
    FourS,
}

/// Running overlap statistics, surfaced to the owning `FrontOfficer` purely
/// for diagnostic logging (not a correctness invariant).
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlapStats {
    pub max: f32,
    pub sum: f32,
    pub count: u32,
}

impl OverlapStats {
    pub fn record(&mut self, overlap: f32) {
        self.max = self.max.max(overlap);
        self.sum += overlap;
        self.count += 1;
    }

    pub fn avg(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f32
        }
    }
}

pub struct NucleusAgent {
    id: AgentId,
    type_name: String,
    variant: NucleusVariant,

    geometry_alias: Spheres,
    future_geometry: Spheres,

    velocities: Vec<Vec3<f32>>,
    accels: Vec<Vec3<f32>>,
    weights: Vec<f32>,

    forces: Vec<ForceVector>,
    pub proximity_pairs_to_nuclei: Vec<ProximityPair>,
    pub proximity_pairs_to_yolk: Vec<ProximityPair>,
    pub proximity_pairs_tracks: Vec<ProximityPair>,

    velocity_currently_desired: Vec3<f32>,
    velocity_persistence_time: f32,

    curr_time: f32,
    incr_time: f32,

    cytoplasm_width: f32,
    ignore_distance: f32,

    /// `(i, j, canonical distance)` restored by the s2s shape force; all
    /// pairs for the `Ns` variant, consecutive neighbours only for `FourS`.
    canonical_distances: Vec<(usize, usize, f32)>,

    params: PhysicsParameters,
    pub overlap_stats: OverlapStats,
}

impl NucleusAgent {
    pub fn new(
        id: AgentId,
        type_name: impl Into<String>,
        variant: NucleusVariant,
        shape: Spheres,
        curr_time: f32,
        incr_time: f32,
        params: PhysicsParameters,
    ) -> Self {
        let n = shape.no_of_spheres();
        let canonical_distances = match variant {
            NucleusVariant::Ns => {
                let mut pairs = Vec::new();
                for i in 0..n {
                    for j in (i + 1)..n {
                        let d0 = (shape.centres[j] - shape.centres[i]).length();
                        pairs.push((i, j, d0));
                    }
                }
                pairs
            }
            NucleusVariant::FourS => {
                assert_eq!(n, 4, "Nucleus4S requires exactly four spheres");
                (0..n - 1)
                    .map(|i| (i, i + 1, (shape.centres[i + 1] - shape.centres[i]).length()))
                    .collect()
            }
        };

        let mut geometry_alias = shape.clone();
        geometry_alias.update_own_aabb();
        let mut future_geometry = shape;
        future_geometry.update_own_aabb();

        NucleusAgent {
            id,
            type_name: type_name.into(),
            variant,
            velocities: vec![Vec3::zero(); n],
            accels: vec![Vec3::zero(); n],
            weights: vec![1.0; n],
            forces: Vec::with_capacity(200),
            proximity_pairs_to_nuclei: Vec::new(),
            proximity_pairs_to_yolk: Vec::new(),
            proximity_pairs_tracks: Vec::new(),
            velocity_currently_desired: Vec3::zero(),
            velocity_persistence_time: 2.0,
            curr_time,
            incr_time,
            cytoplasm_width: 2.0,
            ignore_distance: 10.0,
            canonical_distances,
            geometry_alias,
            future_geometry,
            params,
            overlap_stats: OverlapStats::default(),
        }
    }

    pub fn variant(&self) -> NucleusVariant {
        self.variant
    }

    pub fn curr_time(&self) -> f32 {
        self.curr_time
    }

    pub fn ignore_distance(&self) -> f32 {
        self.ignore_distance
    }

    pub fn set_ignore_distance(&mut self, d: f32) {
        self.ignore_distance = d;
    }

    pub fn set_velocity_currently_desired(&mut self, v: Vec3<f32>) {
        self.velocity_currently_desired = v;
    }

    pub fn velocity_of_sphere(&self, index: usize) -> Vec3<f32> {
        self.velocities[index]
    }

    pub fn no_of_spheres(&self) -> usize {
        self.geometry_alias.no_of_spheres()
    }

    pub fn published_geometry(&self) -> &Spheres {
        &self.geometry_alias
    }

    fn exert_force_on_sphere(&mut self, sphere_idx: usize, vector: Vec3<f32>, force_type: ForceName) {
        let base = self.future_geometry.centres[sphere_idx];
        self.forces
            .push(ForceVector::new(vector, base, sphere_idx, force_type));
    }

    /// Shared integration step used by both `adjust_geometry_by_*_forces`.
    fn integrate(&mut self, dt: f32) {
        for a in self.accels.iter_mut() {
            *a = Vec3::zero();
        }
        for f in &self.forces {
            self.accels[f.hint] += f.vector;
        }
        for i in 0..self.future_geometry.no_of_spheres() {
            self.accels[i] = self.accels[i] / self.weights[i];
            self.velocities[i] += self.accels[i] * dt;
            self.future_geometry.centres[i] += self.velocities[i] * dt;
        }
        self.future_geometry.update_own_aabb();
        self.forces.clear();
    }

    fn build_drive_and_friction_and_shape_forces(&mut self) {
        let tau = self.velocity_persistence_time;
        for i in 0..self.future_geometry.no_of_spheres() {
            let w = self.weights[i];
            let drive = self.velocity_currently_desired * (w / tau);
            self.exert_force_on_sphere(i, drive, ForceName::Drive);

            let friction = self.velocities[i] * (-w / tau);
            self.exert_force_on_sphere(i, friction, ForceName::Friction);
        }

        for &(i, j, d0) in &self.canonical_distances.clone() {
            let ci = self.future_geometry.centres[i];
            let cj = self.future_geometry.centres[j];
            let delta = cj - ci;
            let d = delta.length();
            let diff = d - d0;
            let deadzone = self.params.shape_deadzone;
            let effective = if diff.abs() <= deadzone {
                0.0
            } else {
                diff - diff.signum() * deadzone
            };
            if effective == 0.0 {
                continue;
            }
            let dir = delta.normalize_or_zero();
            let magnitude = self.params.shape_stiffness * effective;
            self.exert_force_on_sphere(i, dir * magnitude, ForceName::S2s);
            self.exert_force_on_sphere(j, dir * -magnitude, ForceName::S2s);
        }
    }
}

impl Agent for NucleusAgent {
    fn advance_and_build_int_forces(&mut self, future_global_time: f32) {
        self.curr_time += self.incr_time;
        if self.curr_time + 1e-4 < future_global_time {
            tracing::warn!(
                agent_id = self.id,
                curr_time = self.curr_time,
                future_global_time,
                "nucleus local time lags the global clock"
            );
        }
        self.build_drive_and_friction_and_shape_forces();
    }

    fn adjust_geometry_by_int_forces(&mut self) {
        self.integrate(self.incr_time);
    }

    fn collect_ext_forces(
        &mut self,
        lookup: &mut dyn NeighbourLookup,
    ) -> Result<(), CalcError> {
        self.proximity_pairs_to_nuclei.clear();
        self.proximity_pairs_to_yolk.clear();
        self.proximity_pairs_tracks.clear();

        let self_geom = Geometry::Spheres(self.future_geometry.clone());
        let nearby = lookup.nearby_aabbs(self.future_geometry.aabb, self.ignore_distance);

        for named in nearby {
            if named.agent_id == self.id {
                continue;
            }
            let Some(shadow) = lookup.nearby_agent(named.agent_id) else {
                continue;
            };
            let mut pairs = Vec::new();
            self_geom.get_distance(&shadow.geometry, &mut pairs)?;
            match shadow.geometry.shape_form() {
                ShapeForm::Spheres => self.proximity_pairs_to_nuclei.extend(pairs.drain(..)),
                ShapeForm::ScalarImg => self.proximity_pairs_to_yolk.extend(pairs.drain(..)),
                ShapeForm::VectorImg => self.proximity_pairs_tracks.extend(pairs.drain(..)),
                ShapeForm::Mesh => {}
            }
        }

        self.build_nuclei_forces();
        self.build_hinter_forces();
        Ok(())
    }

    fn adjust_geometry_by_ext_forces(&mut self) {
        self.integrate(self.incr_time);
    }

    fn publish_geometry(&mut self) {
        for i in 0..self.geometry_alias.no_of_spheres() {
            self.geometry_alias.centres[i] = self.future_geometry.centres[i];
            self.geometry_alias.radii[i] = self.future_geometry.radii[i] + self.cytoplasm_width;
        }
        self.geometry_alias.update_own_aabb();
    }

    fn id(&self) -> AgentId {
        self.id
    }

    fn shadow(&self) -> ShadowAgent {
        ShadowAgent::new(self.id, self.type_name.clone(), Geometry::Spheres(self.geometry_alias.clone()))
    }
}

impl NucleusAgent {
    fn build_nuclei_forces(&mut self) {
        let tau = self.velocity_persistence_time;
        let pairs = self.proximity_pairs_to_nuclei.clone();
        for pair in pairs {
            let i = pair.local_hint as usize;
            let w = self.weights[i];
            let away = pair.other_pos.direction_to(&pair.local_pos);
            let d = pair.distance;

            if d > 0.0 {
                if d < self.params.rep_cutoff {
                    let magnitude = self.params.overlap_level * (-d / self.params.rep_scale).exp();
                    self.exert_force_on_sphere(i, away * magnitude, ForceName::Repulsive);
                }
            } else {
                let depth = d.abs();
                let magnitude = if depth <= self.params.overlap_depth {
                    self.params.overlap_level
                } else {
                    self.params.overlap_level
                        + self.params.overlap_scale * (depth - self.params.overlap_depth)
                };
                self.exert_force_on_sphere(i, away * magnitude, ForceName::Body);
                self.overlap_stats.record(depth);

                // Spec §4.2 projects `v_self - v_other`, but spec §3's
                // ShadowAgent field list (id, type, geometry, version) has
                // no velocity slot, and the wire-serialisation contract in
                // §4.6 carries only sphere centres/radii/version — a
                // foreign agent's velocity is never observable across the
                // FrontOfficer boundary by design. Pinned simplification:
                // treat the foreign sphere as momentarily stationary, so
                // `v_rel` reduces to the local sphere's own velocity.
                let axis = away;
                let v_rel = self.velocities[i];
                let v_perp = v_rel - axis * v_rel.dot(&axis);
                let slide = v_perp * (self.params.slide_scale * w / tau);
                self.exert_force_on_sphere(i, slide, ForceName::Slide);
            }
        }
    }

    fn build_hinter_forces(&mut self) {
        let Some(pair) = self
            .proximity_pairs_to_yolk
            .iter()
            .find(|p| p.local_hint == 0)
            .copied()
        else {
            return;
        };
        let dir = pair.local_pos.direction_to(&pair.other_pos);
        let d = pair.distance;
        let magnitude =
            2.0 * self.params.overlap_level * (self.params.hinter_scale * d * d).min(1.0);
        let force = dir * magnitude;
        for i in 0..self.future_geometry.no_of_spheres() {
            self.exert_force_on_sphere(i, force, ForceName::Hinter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_ns(id: AgentId, centre: Vec3<f32>, radius: f32) -> NucleusAgent {
        let shape = Spheres::new(vec![centre], vec![radius]);
        NucleusAgent::new(
            id,
            "nucleus",
            NucleusVariant::Ns,
            shape,
            0.0,
            0.1,
            PhysicsParameters::default(),
        )
    }

    struct NoNeighbours;
    impl NeighbourLookup for NoNeighbours {
        fn nearby_aabbs(
            &self,
            _from: embryogen_concepts::aabb::Aabb,
            _max_dist: f32,
        ) -> Vec<embryogen_concepts::aabb::NamedAabb> {
            vec![]
        }
        fn nearby_agent(&mut self, _id: AgentId) -> Option<ShadowAgent> {
            None
        }
    }

    #[test]
    fn a_full_round_bumps_geometry_version_by_exactly_two() {
        let mut agent = simple_ns(1, Vec3::zero(), 5.0);
        let mut lookup = NoNeighbours;
        let v0 = agent.geometry_alias.version;

        agent.advance_and_build_int_forces(0.1);
        agent.adjust_geometry_by_int_forces();
        agent.publish_geometry(); // end of executeInternals

        agent.collect_ext_forces(&mut lookup).unwrap();
        agent.adjust_geometry_by_ext_forces();
        agent.publish_geometry(); // end of executeExternals

        assert_eq!(agent.geometry_alias.version, v0 + 2);
    }

    #[test]
    fn publish_geometry_enlarges_radius_by_cytoplasm_width() {
        let mut agent = simple_ns(1, Vec3::zero(), 5.0);
        agent.advance_and_build_int_forces(0.1);
        agent.adjust_geometry_by_int_forces();
        let mut lookup = NoNeighbours;
        agent.collect_ext_forces(&mut lookup).unwrap();
        agent.adjust_geometry_by_ext_forces();
        let v0 = agent.geometry_alias.version;
        agent.publish_geometry();
        assert_eq!(agent.geometry_alias.radii[0], agent.future_geometry.radii[0] + 2.0);
        assert!(agent.geometry_alias.version > v0);
    }

    #[test]
    fn a_stationary_agent_with_no_desired_velocity_does_not_move() {
        let mut agent = simple_ns(1, Vec3::zero(), 5.0);
        let mut lookup = NoNeighbours;
        for _ in 0..5 {
            agent.advance_and_build_int_forces(agent.curr_time() + 0.1);
            agent.adjust_geometry_by_int_forces();
            agent.collect_ext_forces(&mut lookup).unwrap();
            agent.adjust_geometry_by_ext_forces();
            agent.publish_geometry();
        }
        let c = agent.published_geometry().centres[0];
        assert!(c.length() < 1e-3);
    }

    #[test]
    fn four_s_shape_restoring_keeps_consecutive_distances_only() {
        let centres = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        ];
        let shape = Spheres::new(centres, vec![0.5; 4]);
        let agent = NucleusAgent::new(
            1,
            "nucleus4s",
            NucleusVariant::FourS,
            shape,
            0.0,
            0.1,
            PhysicsParameters::default(),
        );
        assert_eq!(agent.canonical_distances.len(), 3);
        assert!(agent.canonical_distances.iter().all(|&(i, j, _)| j == i + 1));
    }
}
