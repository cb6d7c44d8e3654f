//! A process that owns a disjoint slice of the live agent population and
//! runs their five-phase physics each round.

use embryogen_building_blocks::{AgentKind, StringsDictionary};
use embryogen_concepts::aabb::{Aabb, NamedAabb};
use embryogen_concepts::agent::{Agent, AgentId, NeighbourLookup, ShadowAgent};
use embryogen_concepts::errors::InvariantError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::transport::{ShadowSnapshot, Transport};

/// Bookkeeping the Director needs once per round: which agents were born,
/// closed, and which parent→daughter links were established.
#[derive(Clone, Debug, Default)]
pub struct RoundReport {
    pub started_agents: Vec<(AgentId, AgentId)>, // (id, parent_id)
    pub closed_agents: Vec<AgentId>,
}

pub struct FrontOfficer {
    pub rank: usize,
    pub agents: HashMap<AgentId, AgentKind>,
    new_agents: Vec<(AgentId, AgentId)>,
    closed_agents: Vec<AgentId>,

    /// World-wide AABB cache, rebuilt every round from the collective
    /// exchange.
    pub aabbs: Vec<NamedAabb>,
    /// Where every live agent currently lives, rebuilt every round.
    pub agents_to_fos_map: HashMap<AgentId, usize>,

    shadow_agents: HashMap<AgentId, ShadowAgent>,
    agents_and_broadcast_geom_versions: HashMap<AgentId, i32>,

    pub agents_types_dictionary: StringsDictionary,

    transport: Transport,
    snapshot: ShadowSnapshot,
    responder: Option<std::thread::JoinHandle<()>>,

    next_id_hint: i32,
    id_range_end: i32,

    /// The scenario's `updateControls(t)` hook, run once per round at the
    /// end of `executeEndSub2`. Taken out and put back around the call so
    /// the closure can mutate the very `FrontOfficer` it is attached to.
    update_controls: Option<Box<dyn FnMut(&mut FrontOfficer, f32) + Send>>,
}

impl FrontOfficer {
    pub fn new(rank: usize, n_fos: usize, transport: Transport) -> Self {
        let span = i32::MAX / n_fos.max(1) as i32;
        let id_range_start = span * rank as i32 + 1;
        let snapshot: ShadowSnapshot = Arc::new(Mutex::new(HashMap::new()));
        let responder = crate::transport::spawn_responder(
            transport.request_receiver.clone(),
            Arc::clone(&snapshot),
        );
        FrontOfficer {
            rank,
            agents: HashMap::new(),
            new_agents: Vec::new(),
            closed_agents: Vec::new(),
            aabbs: Vec::new(),
            agents_to_fos_map: HashMap::new(),
            shadow_agents: HashMap::new(),
            agents_and_broadcast_geom_versions: HashMap::new(),
            agents_types_dictionary: StringsDictionary::new(),
            transport,
            snapshot,
            responder: Some(responder),
            next_id_hint: id_range_start,
            id_range_end: span * (rank as i32 + 1),
            update_controls: None,
        }
    }

    pub fn set_update_controls(
        &mut self,
        f: impl FnMut(&mut FrontOfficer, f32) + Send + 'static,
    ) {
        self.update_controls = Some(Box::new(f));
    }

    /// Runs the scenario hook, if any, with itself available for mutation
    /// (closing agents, starting new ones, adjusting desired velocities).
    pub fn run_update_controls(&mut self, t: f32) {
        if let Some(mut f) = self.update_controls.take() {
            f(self, t);
            self.update_controls = Some(f);
        }
    }

    /// Mints the next agent id in this FO's disjoint range.
    pub fn next_agent_id(&mut self) -> Result<AgentId, InvariantError> {
        if self.next_id_hint > self.id_range_end {
            return Err(InvariantError::new(format!(
                "FO {} exhausted its agent-id range",
                self.rank
            )));
        }
        let id = self.next_id_hint;
        self.next_id_hint += 1;
        Ok(id)
    }

    pub fn start_new_agent(&mut self, agent: impl Into<AgentKind>, parent_id: AgentId) {
        let agent = agent.into();
        let id = agent.id();
        self.agents_types_dictionary
            .register_this_string(&agent.shadow().type_name);
        self.agents.insert(id, agent);
        self.new_agents.push((id, parent_id));
    }

    pub fn close_agent(&mut self, id: AgentId) {
        if self.agents.remove(&id).is_some() {
            self.closed_agents.push(id);
        }
    }

    pub fn live_agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    // ---------------- round driver ----------------

    pub fn prepare_for_update_and_publish(&mut self) {
        self.aabbs.clear();
        self.agents_to_fos_map.clear();
    }

    pub fn exchange_aabb_of_agents(&mut self) {
        let mine: Vec<NamedAabb> = self
            .agents
            .values()
            .map(|a| {
                let shadow = a.shadow();
                NamedAabb::new(shadow.aabb(), shadow.id, shadow.type_id)
            })
            .collect();
        self.transport.broadcast_aabbs(mine);
    }

    pub fn wait_for_publish_agents_aabbs(&mut self) {
        let tagged = self.transport.collect_aabbs();
        self.aabbs = Vec::with_capacity(tagged.len());
        for (rank, named) in tagged {
            self.agents_to_fos_map.insert(named.agent_id, rank);
            self.aabbs.push(named);
        }
        self.transport.barrier.wait();
    }

    pub fn sync_dictionary_before_exchange(&mut self) {
        let pending: Vec<(u64, String)> = self
            .agents_types_dictionary
            .pending()
            .map(|(h, s)| (*h, s.clone()))
            .collect();
        self.transport.broadcast_dictionary(pending);
    }

    pub fn postprocess_after_update(&mut self) -> Result<(), InvariantError> {
        let incoming = self.transport.collect_dictionary();
        for (hash, s) in incoming {
            self.agents_types_dictionary
                .enlist_the_incoming_item(hash, &s)?;
        }
        self.agents_types_dictionary.mark_all_was_broadcast();
        let live_hashes: Vec<u64> = self.aabbs.iter().map(|n| n.agent_type_id).collect();
        self.agents_types_dictionary.clean_up(live_hashes.iter());
        Ok(())
    }

    /// Refreshes the shadow snapshot the responder thread serves
    /// `request_shadow_agent` replies from. Must run after every
    /// `publish_geometry` phase (both the internal and the external one) so
    /// a foreign fetch never observes a stale version.
    pub fn refresh_shadow_snapshot(&mut self) {
        let mut snapshot = self.snapshot.lock().unwrap();
        snapshot.clear();
        for agent in self.agents.values() {
            snapshot.insert(agent.id(), agent.shadow());
        }
    }

    pub fn drain_round_report(&mut self) -> RoundReport {
        RoundReport {
            started_agents: std::mem::take(&mut self.new_agents),
            closed_agents: std::mem::take(&mut self.closed_agents),
        }
    }

    pub fn run_agents_phase(&mut self, phase: AgentPhase, t_future: f32) -> Result<(), InvariantError> {
        match phase {
            AgentPhase::AdvanceAndBuildIntForces => {
                for agent in self.agents.values_mut() {
                    agent.advance_and_build_int_forces(t_future);
                }
            }
            AgentPhase::AdjustGeometryByIntForces => {
                for agent in self.agents.values_mut() {
                    agent.adjust_geometry_by_int_forces();
                }
            }
            AgentPhase::CollectExtForces => {
                let ids: Vec<AgentId> = self.agents.keys().copied().collect();
                for id in ids {
                    let mut agent = self.agents.remove(&id).unwrap();
                    let result = agent.collect_ext_forces(self);
                    self.agents.insert(id, agent);
                    result.map_err(|e| InvariantError::new(e.message))?;
                }
            }
            AgentPhase::AdjustGeometryByExtForces => {
                for agent in self.agents.values_mut() {
                    agent.adjust_geometry_by_ext_forces();
                }
            }
            AgentPhase::PublishGeometry => {
                for agent in self.agents.values_mut() {
                    agent.publish_geometry();
                }
            }
        }
        Ok(())
    }

    pub fn barrier(&mut self) {
        self.transport.barrier.wait();
    }

    pub fn shutdown(mut self) {
        self.transport.shutdown_responder();
        if let Some(handle) = self.responder.take() {
            let _ = handle.join();
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum AgentPhase {
    AdvanceAndBuildIntForces,
    AdjustGeometryByIntForces,
    CollectExtForces,
    AdjustGeometryByExtForces,
    PublishGeometry,
}

impl NeighbourLookup for FrontOfficer {
    fn nearby_aabbs(&self, from: Aabb, max_dist: f32) -> Vec<NamedAabb> {
        let max_dist_sq = max_dist * max_dist;
        self.aabbs
            .iter()
            .filter(|named| named.aabb.min_distance_sq(&from) < max_dist_sq)
            .copied()
            .collect()
    }

    fn nearby_agent(&mut self, id: AgentId) -> Option<ShadowAgent> {
        if let Some(agent) = self.agents.get(&id) {
            return Some(agent.shadow());
        }
        if let Some(cached) = self.shadow_agents.get(&id) {
            let broadcast_version = *self.agents_and_broadcast_geom_versions.get(&id).unwrap_or(&-1);
            if cached.version() >= broadcast_version {
                return Some(cached.clone());
            }
        }
        let owner = *self.agents_to_fos_map.get(&id)?;
        if owner == usize::MAX || owner == self.rank {
            return None;
        }
        let fetched = self.transport.request_shadow_agent(owner, id)?;
        self.agents_and_broadcast_geom_versions
            .insert(id, fetched.version());
        self.shadow_agents.insert(id, fetched.clone());
        Some(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embryogen_building_blocks::{NucleusAgent, NucleusVariant, PhysicsParameters};
    use embryogen_concepts::geometry::Spheres;
    use embryogen_concepts::vec3::Vec3;

    #[test]
    fn single_fo_round_trip_updates_aabbs_and_map() {
        let transports = Transport::build(1);
        let mut fo = FrontOfficer::new(0, 1, transports.into_iter().next().unwrap());
        let shape = Spheres::new(vec![Vec3::zero()], vec![5.0]);
        let agent = NucleusAgent::new(
            fo.next_agent_id().unwrap(),
            "nucleus",
            NucleusVariant::Ns,
            shape,
            0.0,
            0.1,
            PhysicsParameters::default(),
        );
        fo.start_new_agent(agent, 0);

        fo.prepare_for_update_and_publish();
        fo.run_agents_phase(AgentPhase::AdvanceAndBuildIntForces, 0.1).unwrap();
        fo.run_agents_phase(AgentPhase::AdjustGeometryByIntForces, 0.1).unwrap();
        fo.run_agents_phase(AgentPhase::PublishGeometry, 0.1).unwrap();
        fo.exchange_aabb_of_agents();
        fo.wait_for_publish_agents_aabbs();

        assert_eq!(fo.aabbs.len(), 1);
        assert_eq!(fo.agents_to_fos_map.len(), 1);
        fo.shutdown();
    }
}
