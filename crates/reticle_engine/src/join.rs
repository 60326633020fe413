//! Join nodes: the beta layer.
//!
//! Each join node combines tokens from its parent (or the root token, for a
//! production's first condition) with facts from one alpha memory. The
//! activation and retraction protocol itself lives in [`crate::network`],
//! which owns every arena the protocol touches.

use std::collections::{HashMap, HashSet};

use reticle_foundation::{Fact, Field, Variable};

use crate::alpha::AlphaId;
use crate::arena::arena_id;
use crate::memory::{FactId, WorkingMemory};
use crate::pattern::CrossConditionTest;
use crate::production::ProductionId;
use crate::token::{Bindings, TokenArena, TokenId};

arena_id!(
    /// Handle to a join node.
    JoinId
);

/// Where a join node sends the tokens it creates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum JoinChild {
    /// Next condition of the same production.
    Join(JoinId),
    /// Last condition: the production's terminal node.
    Production(ProductionId),
}

/// One condition position within one production.
#[derive(Clone, Debug)]
pub(crate) struct JoinNode {
    pub production: ProductionId,
    /// Zero-based condition index.
    pub index: usize,
    /// `None` means the root token is the only left input.
    pub parent: Option<JoinId>,
    pub alpha: AlphaId,
    pub tests: Vec<CrossConditionTest>,
    pub binds: Vec<(Variable, Field)>,
    pub child: JoinChild,
    /// Token identity is structural: one token per (parent token, fact).
    pub tokens: HashMap<(TokenId, FactId), TokenId>,
    pub by_fact: HashMap<FactId, HashSet<TokenId>>,
}

impl JoinNode {
    pub fn new(
        production: ProductionId,
        index: usize,
        parent: Option<JoinId>,
        alpha: AlphaId,
        tests: Vec<CrossConditionTest>,
        binds: Vec<(Variable, Field)>,
    ) -> Self {
        Self {
            production,
            index,
            parent,
            alpha,
            tests,
            binds,
            child: JoinChild::Production(production),
            tokens: HashMap::new(),
            by_fact: HashMap::new(),
        }
    }

    /// Runs every cross-condition test for extending `parent` with `fact`.
    ///
    /// Each test walks `levels_up` links from the candidate token to reach the
    /// fact of the earlier condition and compares the two fields.
    pub fn passes(
        &self,
        tokens: &TokenArena,
        memory: &WorkingMemory,
        parent: TokenId,
        fact: &Fact,
    ) -> bool {
        self.tests.iter().all(|test| {
            let ancestor = tokens.ancestor(parent, test.levels_up);
            tokens[ancestor].fact.is_some_and(|prior| {
                memory[prior].get(test.prior_field) == fact.get(test.current_field)
            })
        })
    }

    /// Bindings for the token extending `parent` with `fact`.
    pub fn extend_bindings(&self, parent: &Bindings, fact: &Fact) -> Bindings {
        self.binds.iter().fold(parent.clone(), |bindings, (var, field)| {
            bindings.bind(var.clone(), fact.get(*field).clone())
        })
    }

    /// Records a new token.
    pub fn hold(&mut self, parent: TokenId, fact: FactId, token: TokenId) {
        self.tokens.insert((parent, fact), token);
        self.by_fact.entry(fact).or_default().insert(token);
    }

    /// Forgets a token.
    pub fn release(&mut self, parent: TokenId, fact: FactId, token: TokenId) {
        self.tokens.remove(&(parent, fact));
        if let Some(held) = self.by_fact.get_mut(&fact) {
            held.remove(&token);
            if held.is_empty() {
                self.by_fact.remove(&fact);
            }
        }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.by_fact.clear();
    }
}
