//! The closed set of agent kinds a `FrontOfficer` can host, dispatched the
//! same way [`embryogen_concepts::geometry::Geometry`] dispatches shapes: a
//! tagged union, not a `dyn Agent` trait object.

use embryogen_concepts::agent::{Agent, AgentId, NeighbourLookup, ShadowAgent};
use embryogen_concepts::errors::CalcError;

use crate::hinters::{ShapeHinterAgent, TrajectoriesHinterAgent};
use crate::nucleus_agent::NucleusAgent;

pub enum AgentKind {
    Nucleus(NucleusAgent),
    ShapeHinter(ShapeHinterAgent),
    TrajectoriesHinter(TrajectoriesHinterAgent),
}

impl AgentKind {
    pub fn as_nucleus(&self) -> Option<&NucleusAgent> {
        match self {
            AgentKind::Nucleus(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_nucleus_mut(&mut self) -> Option<&mut NucleusAgent> {
        match self {
            AgentKind::Nucleus(a) => Some(a),
            _ => None,
        }
    }
}

impl Agent for AgentKind {
    fn advance_and_build_int_forces(&mut self, future_global_time: f32) {
        match self {
            AgentKind::Nucleus(a) => a.advance_and_build_int_forces(future_global_time),
            AgentKind::ShapeHinter(a) => a.advance_and_build_int_forces(future_global_time),
            AgentKind::TrajectoriesHinter(a) => a.advance_and_build_int_forces(future_global_time),
        }
    }

    fn adjust_geometry_by_int_forces(&mut self) {
        match self {
            AgentKind::Nucleus(a) => a.adjust_geometry_by_int_forces(),
            AgentKind::ShapeHinter(a) => a.adjust_geometry_by_int_forces(),
            AgentKind::TrajectoriesHinter(a) => a.adjust_geometry_by_int_forces(),
        }
    }

    fn collect_ext_forces(&mut self, lookup: &mut dyn NeighbourLookup) -> Result<(), CalcError> {
        match self {
            AgentKind::Nucleus(a) => a.collect_ext_forces(lookup),
            AgentKind::ShapeHinter(a) => a.collect_ext_forces(lookup),
            AgentKind::TrajectoriesHinter(a) => a.collect_ext_forces(lookup),
        }
    }

    fn adjust_geometry_by_ext_forces(&mut self) {
        match self {
            AgentKind::Nucleus(a) => a.adjust_geometry_by_ext_forces(),
            AgentKind::ShapeHinter(a) => a.adjust_geometry_by_ext_forces(),
            AgentKind::TrajectoriesHinter(a) => a.adjust_geometry_by_ext_forces(),
        }
    }

    fn publish_geometry(&mut self) {
        match self {
            AgentKind::Nucleus(a) => a.publish_geometry(),
            AgentKind::ShapeHinter(a) => a.publish_geometry(),
            AgentKind::TrajectoriesHinter(a) => a.publish_geometry(),
        }
    }

    fn id(&self) -> AgentId {
        match self {
            AgentKind::Nucleus(a) => a.id(),
            AgentKind::ShapeHinter(a) => a.id(),
            AgentKind::TrajectoriesHinter(a) => a.id(),
        }
    }

    fn shadow(&self) -> ShadowAgent {
        match self {
            AgentKind::Nucleus(a) => a.shadow(),
            AgentKind::ShapeHinter(a) => a.shadow(),
            AgentKind::TrajectoriesHinter(a) => a.shadow(),
        }
    }
}

impl From<NucleusAgent> for AgentKind {
    fn from(a: NucleusAgent) -> Self {
        AgentKind::Nucleus(a)
    }
}

impl From<ShapeHinterAgent> for AgentKind {
    fn from(a: ShapeHinterAgent) -> Self {
        AgentKind::ShapeHinter(a)
    }
}

impl From<TrajectoriesHinterAgent> for AgentKind {
    fn from(a: TrajectoriesHinterAgent) -> Self {
        AgentKind::TrajectoriesHinter(a)
    }
}
