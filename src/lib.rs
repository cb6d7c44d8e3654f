//! The scenario table and the names the CLI dispatches by.

pub mod scenarios;

pub use scenarios::{find, ScenarioEntry, SCENARIOS};
