//! Symmetric player-to-player relations (has partnered with, has faced).

use crate::models::player::PlayerId;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Undirected relation between players, stored as adjacency sets.
///
/// Invariant: `b` is in `a`'s set iff `a` is in `b`'s set. Only [`RelationHistory::link`]
/// adds edges, so the invariant cannot be broken from outside.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationHistory {
    links: HashMap<PlayerId, HashSet<PlayerId>>,
}

impl RelationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `id` has an (possibly empty) entry.
    pub fn ensure_player(&mut self, id: &str) {
        if !self.links.contains_key(id) {
            self.links.insert(id.to_string(), HashSet::new());
        }
    }

    /// Record the relation both ways. Self-links are ignored.
    pub fn link(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.links
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.links
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.links.get(a).is_some_and(|set| set.contains(b))
    }

    pub fn has_player(&self, id: &str) -> bool {
        self.links.contains_key(id)
    }

    /// Drop the player's entry and scrub it from everyone else's set.
    pub fn forget_player(&mut self, id: &str) {
        self.links.remove(id);
        for set in self.links.values_mut() {
            set.remove(id);
        }
    }

    /// Empty every set but keep the per-player entries.
    pub fn clear_links(&mut self) {
        for set in self.links.values_mut() {
            set.clear();
        }
    }

    /// Remove everything, entries included.
    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// Sorted related ids for one player (empty if unknown).
    pub fn related(&self, id: &str) -> Vec<PlayerId> {
        let mut out: Vec<PlayerId> = self
            .links
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        out.sort();
        out
    }

    /// Serializable form: player id to sorted list of related ids.
    pub fn to_lists(&self) -> BTreeMap<PlayerId, Vec<PlayerId>> {
        self.links
            .keys()
            .map(|id| (id.clone(), self.related(id)))
            .collect()
    }

    /// Rebuild from lists. Every listed pair is linked both ways, so a one-sided
    /// entry in an older snapshot comes back symmetric.
    pub fn from_lists(lists: &BTreeMap<PlayerId, Vec<PlayerId>>) -> Self {
        let mut history = Self::new();
        for (id, related) in lists {
            history.ensure_player(id);
            for other in related {
                history.link(id, other);
            }
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_is_symmetric() {
        let mut h = RelationHistory::new();
        h.link("a", "b");
        assert!(h.contains("a", "b"));
        assert!(h.contains("b", "a"));
        assert!(!h.contains("a", "c"));
    }

    #[test]
    fn self_link_is_ignored() {
        let mut h = RelationHistory::new();
        h.link("a", "a");
        assert!(!h.contains("a", "a"));
    }

    #[test]
    fn forget_player_scrubs_every_set() {
        let mut h = RelationHistory::new();
        h.link("a", "b");
        h.link("c", "b");
        h.forget_player("b");
        assert!(!h.has_player("b"));
        assert!(h.related("a").is_empty());
        assert!(h.related("c").is_empty());
    }

    #[test]
    fn from_lists_repairs_one_sided_entries() {
        let mut lists = BTreeMap::new();
        lists.insert("a".to_string(), vec!["b".to_string()]);
        let h = RelationHistory::from_lists(&lists);
        assert!(h.contains("b", "a"));
        assert_eq!(h.related("b"), vec!["a".to_string()]);
    }
}
