//! A grow-only `hash ↔ type-string` map, split into a broadcast-pending and
//! an already-known partition, so AABBs can travel with fixed-size hashes
//! and a type name is resolved only when an agent actually needs to filter
//! on it.

use embryogen_concepts::agent::{hash_type_name, AgentTypeId};
use embryogen_concepts::errors::{InvariantError, RequestError};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct StringsDictionary {
    known: HashMap<AgentTypeId, String>,
    new: HashMap<AgentTypeId, String>,
}

impl StringsDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `s`, inserting it into the pending partition unless either
    /// partition already has it.
    pub fn register_this_string(&mut self, s: &str) -> AgentTypeId {
        let hash = hash_type_name(s);
        if !self.known.contains_key(&hash) && !self.new.contains_key(&hash) {
            self.new.insert(hash, s.to_string());
        }
        hash
    }

    pub fn translate_id_to_string(&self, hash: AgentTypeId) -> Result<&str, RequestError> {
        self.known
            .get(&hash)
            .or_else(|| self.new.get(&hash))
            .map(|s| s.as_str())
            .ok_or_else(|| RequestError::new(format!("unknown type-id hash {hash}")))
    }

    /// Accepts an incoming `(hash, string)` pair from a peer FrontOfficer;
    /// rejects a hash collision with a locally-known different string,
    /// which is an unrecoverable dictionary-consistency invariant.
    pub fn enlist_the_incoming_item(
        &mut self,
        hash: AgentTypeId,
        s: &str,
    ) -> Result<(), InvariantError> {
        if let Some(existing) = self.known.get(&hash).or_else(|| self.new.get(&hash)) {
            if existing != s {
                return Err(InvariantError::new(format!(
                    "dictionary hash collision: {hash} maps to both {existing:?} and {s:?}"
                )));
            }
            return Ok(());
        }
        self.new.insert(hash, s.to_string());
        Ok(())
    }

    pub fn pending(&self) -> impl Iterator<Item = (&AgentTypeId, &String)> {
        self.new.iter()
    }

    pub fn mark_all_was_broadcast(&mut self) {
        self.known.extend(self.new.drain());
    }

    /// Removes any known hash not referenced by `current_hashes`.
    pub fn clean_up<'a>(&mut self, current_hashes: impl Iterator<Item = &'a AgentTypeId>) {
        let live: std::collections::HashSet<AgentTypeId> = current_hashes.copied().collect();
        self.known.retain(|h, _| live.contains(h));
    }

    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    pub fn new_len(&self) -> usize {
        self.new.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_register_then_translate() {
        let mut dict = StringsDictionary::new();
        let hash = dict.register_this_string("nucleus");
        assert_eq!(dict.translate_id_to_string(hash).unwrap(), "nucleus");
    }

    #[test]
    fn cleanup_drops_unreferenced_known_hashes() {
        let mut dict = StringsDictionary::new();
        let h1 = dict.register_this_string("nucleus");
        let h2 = dict.register_this_string("yolk");
        dict.mark_all_was_broadcast();
        assert_eq!(dict.known_len(), 2);
        dict.clean_up(std::iter::once(&h1));
        assert_eq!(dict.known_len(), 1);
        assert!(dict.translate_id_to_string(h1).is_ok());
        assert!(dict.translate_id_to_string(h2).is_err());
    }

    #[test]
    fn enlist_rejects_colliding_hash_with_different_string() {
        let mut dict = StringsDictionary::new();
        let hash = dict.register_this_string("nucleus");
        assert!(dict.enlist_the_incoming_item(hash, "nucleus").is_ok());
        assert!(dict.enlist_the_incoming_item(hash, "yolk").is_err());
    }

    #[test]
    fn sync_stress_two_dictionaries_converge() {
        let mut a = StringsDictionary::new();
        let mut b = StringsDictionary::new();
        a.register_this_string("nucleus");
        b.register_this_string("yolk");

        let a_pending: Vec<_> = a
            .pending()
            .map(|(h, s)| (*h, s.clone()))
            .collect();
        let b_pending: Vec<_> = b
            .pending()
            .map(|(h, s)| (*h, s.clone()))
            .collect();

        for (h, s) in &b_pending {
            a.enlist_the_incoming_item(*h, s).unwrap();
        }
        for (h, s) in &a_pending {
            b.enlist_the_incoming_item(*h, s).unwrap();
        }

        a.mark_all_was_broadcast();
        b.mark_all_was_broadcast();

        assert_eq!(a.known_len(), 2);
        assert_eq!(b.known_len(), 2);
        assert_eq!(a.new_len(), 0);
        assert_eq!(b.new_len(), 0);
    }
}
