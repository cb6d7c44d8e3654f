//! The fixed table of named scenarios the CLI dispatches by name.

pub mod a_few_agents;
pub mod cell_cycle;
pub mod common;
pub mod drag_and_rotate;
pub mod fluo_texture;
pub mod mpi_debug;
pub mod one_agent;
pub mod parallel;
pub mod perlin_showcase;
pub mod pseudo_division;
pub mod regular_drosophila;
pub mod synthoscopy;
pub mod tetris;

use embryogen_concepts::errors::EmbryoGenError;
use embryogen_core::{Director, FrontOfficer, SceneControls};

/// One named entry in the scenario table: its `scene`/`build` functions,
/// addressed by the exact name the CLI table lists. `scene`/`build` are
/// kept apart (rather than collapsing to a single `run`) so the CLI can
/// apply `--fo-count`/`--no-prompt` overrides to the `SceneControls`
/// before the agents are built.
pub struct ScenarioEntry {
    pub name: &'static str,
    pub scene: fn() -> SceneControls,
    pub build: fn(&SceneControls) -> Vec<FrontOfficer>,
}

impl ScenarioEntry {
    pub fn run_with(&self, scene: SceneControls) -> Result<Director, EmbryoGenError> {
        let fos = (self.build)(&scene);
        embryogen_core::run::run_to_completion(scene, fos)
    }
}

pub const SCENARIOS: &[ScenarioEntry] = &[
    ScenarioEntry { name: "regularDrosophila", scene: regular_drosophila::scene, build: regular_drosophila::build },
    ScenarioEntry { name: "aFewAgents", scene: a_few_agents::scene, build: a_few_agents::build },
    ScenarioEntry { name: "pseudoDivision", scene: pseudo_division::scene, build: pseudo_division::build },
    ScenarioEntry { name: "dragAndRotate", scene: drag_and_rotate::scene, build: drag_and_rotate::build },
    ScenarioEntry { name: "cellCycle", scene: cell_cycle::scene, build: cell_cycle::build },
    ScenarioEntry { name: "fluoTexture", scene: fluo_texture::scene, build: fluo_texture::build },
    ScenarioEntry { name: "synthoscopy", scene: synthoscopy::scene, build: synthoscopy::build },
    ScenarioEntry { name: "PerlinShowCase", scene: perlin_showcase::scene, build: perlin_showcase::build },
    ScenarioEntry { name: "tetris", scene: tetris::scene, build: tetris::build },
    ScenarioEntry { name: "mpiDebug", scene: mpi_debug::scene, build: mpi_debug::build },
    ScenarioEntry { name: "parallel", scene: parallel::scene, build: parallel::build },
    ScenarioEntry { name: "oneAgent", scene: one_agent::scene, build: one_agent::build },
];

pub fn find(name: &str) -> Option<&'static ScenarioEntry> {
    SCENARIOS.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_resolves_by_name() {
        for entry in SCENARIOS {
            assert!(find(entry.name).is_some());
        }
    }

    #[test]
    fn unknown_names_resolve_to_nothing() {
        assert!(find("notAScenario").is_none());
    }
}
