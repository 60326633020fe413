//! Working memory: the set of facts currently known to the engine.
//!
//! Each fact gets a [`FactId`] on insertion so the network can refer to it by
//! handle. The id stays valid until the fact is released, which happens only
//! after every token built on it has been retracted.

use std::collections::HashMap;
use std::ops::Index;

use reticle_foundation::Fact;

use crate::arena::{Arena, arena_id};

arena_id!(
    /// Handle to a fact held in working memory.
    FactId
);

/// The full current set of facts.
#[derive(Clone, Debug, Default)]
pub(crate) struct WorkingMemory {
    facts: Arena<FactId, Fact>,
    ids: HashMap<Fact, FactId>,
}

impl WorkingMemory {
    /// Inserts a fact. Returns `None` if it was already present.
    pub fn insert(&mut self, fact: Fact) -> Option<FactId> {
        if self.ids.contains_key(&fact) {
            return None;
        }
        let id = self.facts.alloc(fact.clone());
        self.ids.insert(fact, id);
        Some(id)
    }

    /// Returns the handle of a fact if it is present.
    pub fn id_of(&self, fact: &Fact) -> Option<FactId> {
        self.ids.get(fact).copied()
    }

    /// Drops a fact and frees its handle.
    pub fn release(&mut self, id: FactId) -> Option<Fact> {
        let fact = self.facts.remove(id)?;
        self.ids.remove(&fact);
        Some(fact)
    }

    pub fn contains(&self, fact: &Fact) -> bool {
        self.ids.contains_key(fact)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.facts.iter()
    }

    pub fn clear(&mut self) {
        self.facts.clear();
        self.ids.clear();
    }
}

impl Index<FactId> for WorkingMemory {
    type Output = Fact;

    fn index(&self, id: FactId) -> &Fact {
        &self.facts[id]
    }
}
