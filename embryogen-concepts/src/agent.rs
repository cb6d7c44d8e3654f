//! The agent lifecycle contract: the fixed five-phase round every live
//! agent runs, and the immutable snapshot ([`ShadowAgent`]) other processes
//! ever get to see of it.

use crate::aabb::Aabb;
use crate::errors::CalcError;
use crate::geometry::Geometry;

/// Globally unique agent identifier. Each FrontOfficer allocates from a
/// disjoint range, so no cross-process coordination is needed to mint one.
pub type AgentId = i32;

/// A hashed, process-local type name (e.g. "nucleus", "yolk"); travels with
/// AABBs instead of a variable-length string.
pub type AgentTypeId = u64;

pub fn hash_type_name(name: &str) -> AgentTypeId {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

/// Immutable view of an agent's published geometry plus identity; the only
/// thing another FrontOfficer ever sees of an agent it does not own.
#[derive(Clone, Debug)]
pub struct ShadowAgent {
    pub id: AgentId,
    pub type_name: String,
    pub type_id: AgentTypeId,
    pub geometry: Geometry,
}

impl ShadowAgent {
    pub fn new(id: AgentId, type_name: impl Into<String>, geometry: Geometry) -> Self {
        let type_name = type_name.into();
        let type_id = hash_type_name(&type_name);
        ShadowAgent {
            id,
            type_name,
            type_id,
            geometry,
        }
    }

    pub fn version(&self) -> i32 {
        self.geometry.version()
    }

    pub fn aabb(&self) -> Aabb {
        self.geometry.aabb()
    }
}

/// The fixed five-phase per-round contract every live agent implements.
/// All phases are required; their call order within a round is fixed by
/// the round driver, never by the agent itself.
pub trait Agent {
    /// Assemble internal forces (drive, friction, shape-restoring); must
    /// bump the agent's local time to at least `future_global_time`.
    fn advance_and_build_int_forces(&mut self, future_global_time: f32);

    /// Integrate accumulated forces into the work-in-progress geometry.
    fn adjust_geometry_by_int_forces(&mut self);

    /// Query neighbours and foreign geometry, assemble external forces.
    fn collect_ext_forces(&mut self, lookup: &mut dyn NeighbourLookup) -> Result<(), CalcError>;

    /// Same integration step as the internal phase.
    fn adjust_geometry_by_ext_forces(&mut self);

    /// Publish the work-in-progress geometry as the agent's new public
    /// snapshot and bump its version.
    fn publish_geometry(&mut self);

    fn id(&self) -> AgentId;
    fn shadow(&self) -> ShadowAgent;
}

/// The subset of `FrontOfficer` capabilities an agent needs during
/// `collect_ext_forces`: a broad-phase neighbour scan and an on-demand
/// (possibly remote) fetch of a foreign agent's detailed geometry.
pub trait NeighbourLookup {
    fn nearby_aabbs(&self, from: Aabb, max_dist: f32) -> Vec<crate::aabb::NamedAabb>;
    fn nearby_agent(&mut self, id: AgentId) -> Option<ShadowAgent>;
}
