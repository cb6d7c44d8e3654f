//! Pure value types and trait contracts shared by every other crate in the
//! workspace: vector/AABB math, the geometry distance kernel, the error
//! taxonomy, and the agent lifecycle contract. This crate owns no round
//! driver, no transport, no I/O.

pub mod aabb;
pub mod agent;
pub mod errors;
pub mod force;
pub mod geometry;
pub mod vec3;

pub use aabb::{Aabb, NamedAabb, TOOFAR};
pub use agent::{Agent, AgentId, AgentTypeId, NeighbourLookup, ShadowAgent};
pub use errors::{
    BoundaryError, CalcError, ConfigError, EmbryoGenError, InvariantError, IoError, RequestError,
};
pub use force::{ForceName, ForceVector};
pub use geometry::{Geometry, Mesh, ProximityPair, ScalarImg, ScalarImgModel, ShapeForm, Spheres, VectorImg, VectorImgPolicy};
pub use vec3::Vec3;
