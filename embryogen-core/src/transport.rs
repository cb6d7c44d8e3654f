//! The single-process realisation of the distributed transport layer:
//! `crossbeam_channel` senders/receivers standing in for MPI point-to-point
//! messages, and `hurdles::Barrier` standing in for the collective fence.
//! One OS thread plays the role of one process (Director or FrontOfficer),
//! mirroring the legacy per-thread round driver this is grounded on.

use crossbeam_channel::{Receiver, Sender};
use embryogen_concepts::agent::AgentId;
use embryogen_concepts::aabb::NamedAabb;
use embryogen_concepts::agent::ShadowAgent;
use hurdles::Barrier;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A request the async responder thread answers on behalf of its owning
/// FrontOfficer.
pub enum ShadowRequest {
    Fetch {
        id: AgentId,
        reply: Sender<Option<ShadowAgent>>,
    },
    SetDetailedDrawing {
        id: AgentId,
        enabled: bool,
    },
    SetDetailedReporting {
        id: AgentId,
        enabled: bool,
    },
    SetRenderingDebug {
        enabled: bool,
    },
    Shutdown,
}

/// Shared, mutex-guarded snapshot of an FO's published shadow agents. The
/// physics thread refreshes it once per round, right after `publishGeometry`;
/// the responder thread only ever reads it, which is what makes the
/// concurrent access safe (writes happen strictly between barriers and are
/// never interleaved with a read of the same round's data).
pub type ShadowSnapshot = Arc<Mutex<HashMap<AgentId, ShadowAgent>>>;

/// One rank's view of the per-FO communication fabric: the collective
/// barrier shared by all ranks, a full mesh of AABB broadcast channels, a
/// full mesh of dictionary broadcast channels, and this rank's inbound
/// shadow-agent request channel (served by its responder thread).
pub struct Transport {
    pub rank: usize,
    pub n_fos: usize,
    pub barrier: Barrier,
    aabb_senders: Vec<Sender<(usize, Vec<NamedAabb>)>>,
    aabb_receiver: Receiver<(usize, Vec<NamedAabb>)>,
    dict_senders: Vec<Sender<Vec<(u64, String)>>>,
    dict_receiver: Receiver<Vec<(u64, String)>>,
    pub request_senders: Vec<Sender<ShadowRequest>>,
    pub request_receiver: Receiver<ShadowRequest>,
}

impl Transport {
    /// Builds one `Transport` per rank, wired into a full mesh so every
    /// rank can address every other rank directly.
    pub fn build(n_fos: usize) -> Vec<Transport> {
        let barrier_template = Barrier::new(n_fos);

        let mut aabb_txs = Vec::with_capacity(n_fos);
        let mut aabb_rxs = Vec::with_capacity(n_fos);
        let mut dict_txs = Vec::with_capacity(n_fos);
        let mut dict_rxs = Vec::with_capacity(n_fos);
        let mut req_txs = Vec::with_capacity(n_fos);
        let mut req_rxs = Vec::with_capacity(n_fos);

        for _ in 0..n_fos {
            let (tx, rx) = crossbeam_channel::unbounded();
            aabb_txs.push(tx);
            aabb_rxs.push(rx);
            let (tx, rx) = crossbeam_channel::unbounded();
            dict_txs.push(tx);
            dict_rxs.push(rx);
            let (tx, rx) = crossbeam_channel::unbounded();
            req_txs.push(tx);
            req_rxs.push(rx);
        }

        aabb_rxs
            .into_iter()
            .zip(dict_rxs)
            .zip(req_rxs)
            .enumerate()
            .map(|(rank, ((aabb_receiver, dict_receiver), request_receiver))| Transport {
                rank,
                n_fos,
                barrier: barrier_template.clone(),
                aabb_senders: aabb_txs.clone(),
                aabb_receiver,
                dict_senders: dict_txs.clone(),
                dict_receiver,
                request_senders: req_txs.clone(),
                request_receiver,
            })
            .collect()
    }

    /// Sends this rank's AABBs to every other rank (including itself, for
    /// a uniform receive loop), tagged with the sending rank so receivers
    /// can learn who owns each agent.
    pub fn broadcast_aabbs(&self, aabbs: Vec<NamedAabb>) {
        for sender in &self.aabb_senders {
            let _ = sender.send((self.rank, aabbs.clone()));
        }
    }

    /// Blocks until all `n_fos` ranks (including this one) have broadcast,
    /// returning every rank's AABBs paired with the rank that published them.
    pub fn collect_aabbs(&self) -> Vec<(usize, NamedAabb)> {
        let mut all = Vec::new();
        for _ in 0..self.n_fos {
            if let Ok((rank, batch)) = self.aabb_receiver.recv() {
                all.extend(batch.into_iter().map(|named| (rank, named)));
            }
        }
        all
    }

    pub fn broadcast_dictionary(&self, pending: Vec<(u64, String)>) {
        for sender in &self.dict_senders {
            let _ = sender.send(pending.clone());
        }
    }

    pub fn collect_dictionary(&self) -> Vec<(u64, String)> {
        let mut all = Vec::new();
        for _ in 0..self.n_fos {
            if let Ok(mut batch) = self.dict_receiver.recv() {
                all.append(&mut batch);
            }
        }
        all
    }

    /// Synchronous request for a foreign agent's published geometry,
    /// addressed to the rank that owns it.
    pub fn request_shadow_agent(&self, owner_rank: usize, id: AgentId) -> Option<ShadowAgent> {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        self.request_senders[owner_rank]
            .send(ShadowRequest::Fetch { id, reply: reply_tx })
            .ok()?;
        reply_rx.recv().ok().flatten()
    }

    pub fn shutdown_responder(&self) {
        let _ = self.request_senders[self.rank].send(ShadowRequest::Shutdown);
    }
}

/// Spawns the dedicated responder thread for one FrontOfficer. It services
/// `ShadowRequest`s against `snapshot` until it receives `Shutdown`.
pub fn spawn_responder(
    request_receiver: Receiver<ShadowRequest>,
    snapshot: ShadowSnapshot,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || loop {
        match request_receiver.recv() {
            Ok(ShadowRequest::Fetch { id, reply }) => {
                let agent = snapshot.lock().unwrap().get(&id).cloned();
                let _ = reply.send(agent);
            }
            Ok(ShadowRequest::SetDetailedDrawing { .. })
            | Ok(ShadowRequest::SetDetailedReporting { .. })
            | Ok(ShadowRequest::SetRenderingDebug { .. }) => {
                // Diagnostic toggles consumed by the rendering path; no
                // state lives on the transport layer itself.
            }
            Ok(ShadowRequest::Shutdown) | Err(_) => break,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_broadcast_reaches_every_rank() {
        let transports = Transport::build(3);
        let handles: Vec<_> = transports
            .into_iter()
            .enumerate()
            .map(|(rank, t)| {
                std::thread::spawn(move || {
                    t.broadcast_aabbs(vec![NamedAabb::new(
                        embryogen_concepts::aabb::Aabb::empty(),
                        rank as i32,
                        0,
                    )]);
                    t.barrier.clone().wait();
                    t.collect_aabbs().len()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 3);
        }
    }
}
