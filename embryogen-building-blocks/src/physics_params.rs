//! Force-recipe constants. The original program kept these as process-wide
//! globals (`fstrength_*`); per the redesign notes they are bundled into one
//! immutable record passed into agent constructors instead, so there is no
//! runtime singleton.

#[derive(Clone, Copy, Debug)]
pub struct PhysicsParameters {
    /// TRAgen `A`: overlap-force magnitude plateau, in newtons.
    pub overlap_level: f32,
    /// TRAgen `k`: overlap-force slope beyond the plateau depth, N/um.
    pub overlap_scale: f32,
    /// TRAgen `delta_o`: plateau depth, um.
    pub overlap_depth: f32,
    /// TRAgen `B`: repulsive decay length, um.
    pub rep_scale: f32,
    /// distance beyond which repulsion does not act, um.
    pub rep_cutoff: f32,
    /// unitless slide-force scale `kappa`.
    pub slide_scale: f32,
    /// 1/um^2 hinter-force scale `kappa_h`.
    pub hinter_scale: f32,
    /// linear-spring stiffness for s2s shape restoring, N/um.
    pub shape_stiffness: f32,
    /// deadzone radius below which s2s shape restoring does not act, um.
    pub shape_deadzone: f32,
}

impl Default for PhysicsParameters {
    fn default() -> Self {
        PhysicsParameters {
            overlap_level: 0.2,
            overlap_scale: 0.1,
            overlap_depth: 0.1,
            rep_scale: 1.0,
            rep_cutoff: 3.0,
            slide_scale: 0.5,
            hinter_scale: 0.1,
            shape_stiffness: 0.2,
            shape_deadzone: 0.1,
        }
    }
}
