use crate::vec3::Vec3;

/// Tag attached to a [`ForceVector`], named after the TRAgen force recipe
/// that produced it; used only for diagnostics and force-recipe dispatch,
/// never for identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceName {
    S2s,
    Drive,
    Friction,
    Repulsive,
    Body,
    Slide,
    Hinter,
}

/// One force contribution: a vector applied at `base`, tagged with the
/// sphere index it acts on (`hint`) and the recipe that produced it.
#[derive(Clone, Copy, Debug)]
pub struct ForceVector {
    pub vector: Vec3<f32>,
    pub base: Vec3<f32>,
    pub hint: usize,
    pub force_type: ForceName,
}

impl ForceVector {
    pub fn new(vector: Vec3<f32>, base: Vec3<f32>, hint: usize, force_type: ForceName) -> Self {
        ForceVector {
            vector,
            base,
            hint,
            force_type,
        }
    }
}
