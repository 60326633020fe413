//! Alpha memories: one per distinct condition shape, shared by every
//! production that uses it.
//!
//! A memory holds exactly the facts in working memory that satisfy its key.
//! Memories with a constant predicate are indexed by that predicate so a new
//! fact is only tested against memories that could match it.

use std::collections::{HashMap, HashSet};

use reticle_foundation::{Fact, Field, Term};

use crate::arena::{Arena, arena_id};
use crate::join::JoinId;
use crate::memory::{FactId, WorkingMemory};
use crate::pattern::AlphaKey;

arena_id!(
    /// Handle to an alpha memory.
    AlphaId
);

/// Facts matching one condition shape.
#[derive(Clone, Debug)]
pub(crate) struct AlphaMemory {
    pub key: AlphaKey,
    pub facts: HashSet<FactId>,
    /// Join nodes fed by this memory.
    pub successors: Vec<JoinId>,
}

impl AlphaMemory {
    /// Adds a matching fact. Re-adding a present fact is a no-op.
    pub fn insert(&mut self, fact: FactId) -> bool {
        self.facts.insert(fact)
    }

    pub fn remove(&mut self, fact: FactId) -> bool {
        self.facts.remove(&fact)
    }
}

/// Every alpha memory of one network, deduplicated by key.
#[derive(Clone, Debug)]
pub(crate) struct AlphaNetwork {
    memories: Arena<AlphaId, AlphaMemory>,
    by_key: HashMap<AlphaKey, AlphaId>,
    by_predicate: HashMap<Term, Vec<AlphaId>>,
    /// Memories whose predicate is a variable; candidates for every fact.
    any_predicate: Vec<AlphaId>,
    use_index: bool,
}

impl AlphaNetwork {
    pub fn new(use_index: bool) -> Self {
        Self {
            memories: Arena::default(),
            by_key: HashMap::new(),
            by_predicate: HashMap::new(),
            any_predicate: Vec::new(),
            use_index,
        }
    }

    /// Returns the memory for `key`, creating and filling it from working
    /// memory if it does not exist yet.
    pub fn get_or_create(&mut self, key: &AlphaKey, memory: &WorkingMemory) -> AlphaId {
        if let Some(&id) = self.by_key.get(key) {
            return id;
        }
        let facts = memory
            .iter()
            .filter(|(_, fact)| key.matches(fact))
            .map(|(id, _)| id)
            .collect();
        let id = self.memories.alloc(AlphaMemory {
            key: key.clone(),
            facts,
            successors: Vec::new(),
        });
        self.by_key.insert(key.clone(), id);
        match key.constant(Field::Predicate) {
            Some(predicate) => self.by_predicate.entry(predicate.clone()).or_default().push(id),
            None => self.any_predicate.push(id),
        }
        id
    }

    /// Adds a new fact to every memory whose key it satisfies, appending the
    /// successors of each memory that gained it to `activated`.
    pub fn insert_fact(&mut self, fact: &Fact, id: FactId, activated: &mut Vec<JoinId>) {
        self.for_each_candidate(&fact.predicate, |memory| {
            if memory.key.matches(fact) && memory.insert(id) {
                activated.extend_from_slice(&memory.successors);
            }
        });
    }

    /// Removes a fact from every memory holding it, appending the successors
    /// of each memory that lost it to `retracted`.
    pub fn remove_fact(&mut self, fact: &Fact, id: FactId, retracted: &mut Vec<JoinId>) {
        self.for_each_candidate(&fact.predicate, |memory| {
            if memory.remove(id) {
                retracted.extend_from_slice(&memory.successors);
            }
        });
    }

    /// Visits the memories that might hold a fact with this predicate; each
    /// still has to check its key.
    fn for_each_candidate(&mut self, predicate: &Term, mut visit: impl FnMut(&mut AlphaMemory)) {
        let Self {
            memories,
            by_predicate,
            any_predicate,
            use_index,
            ..
        } = self;
        if !*use_index {
            memories.values_mut().for_each(visit);
            return;
        }
        let indexed = by_predicate.get(predicate).map_or(&[][..], Vec::as_slice);
        for &id in indexed.iter().chain(any_predicate.iter()) {
            visit(&mut memories[id]);
        }
    }

    /// Unhooks a join node. A memory left with no successors is dropped.
    pub fn detach(&mut self, id: AlphaId, join: JoinId) {
        let Some(memory) = self.memories.get_mut(id) else {
            return;
        };
        memory.successors.retain(|j| *j != join);
        if !memory.successors.is_empty() {
            return;
        }
        let Some(memory) = self.memories.remove(id) else {
            return;
        };
        self.by_key.remove(&memory.key);
        match memory.key.constant(Field::Predicate) {
            Some(predicate) => {
                if let Some(ids) = self.by_predicate.get_mut(predicate) {
                    ids.retain(|a| *a != id);
                    if ids.is_empty() {
                        self.by_predicate.remove(predicate);
                    }
                }
            }
            None => self.any_predicate.retain(|a| *a != id),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AlphaId, &AlphaMemory)> {
        self.memories.iter()
    }

    /// Empties every memory, keeping the memories and their successors.
    pub fn clear_facts(&mut self) {
        for memory in self.memories.values_mut() {
            memory.facts.clear();
        }
    }
}

impl std::ops::Index<AlphaId> for AlphaNetwork {
    type Output = AlphaMemory;

    fn index(&self, id: AlphaId) -> &AlphaMemory {
        &self.memories[id]
    }
}

impl std::ops::IndexMut<AlphaId> for AlphaNetwork {
    fn index_mut(&mut self, id: AlphaId) -> &mut AlphaMemory {
        &mut self.memories[id]
    }
}
