//! The Rete network: working memory, alpha memories, join nodes, tokens, and
//! terminal nodes, plus the incremental add/remove protocol that keeps them
//! consistent.
//!
//! Every call here runs to quiescence before returning. The invariants that
//! hold between calls:
//!
//! - an alpha memory holds exactly the working-memory facts matching its key;
//! - a join node holds exactly one token per (parent token, fact) pair that
//!   passes its cross-condition tests, where the parent ranges over the
//!   parent join's tokens (or the root token) and the fact over its alpha memory;
//! - a production node's matches are the last join's tokens that pass its filters.

use std::collections::HashMap;

use reticle_foundation::Fact;
use tracing::trace;

use crate::alpha::{AlphaId, AlphaMemory, AlphaNetwork};
use crate::arena::Arena;
use crate::config::EngineConfig;
use crate::join::{JoinChild, JoinId, JoinNode};
use crate::memory::{FactId, WorkingMemory};
use crate::pattern::CompiledProduction;
use crate::production::{ProductionId, ProductionNode};
use crate::token::{Bindings, TokenArena, TokenId};

#[derive(Clone, Debug)]
pub(crate) struct ReteNetwork {
    memory: WorkingMemory,
    alphas: AlphaNetwork,
    joins: Arena<JoinId, JoinNode>,
    tokens: TokenArena,
    productions: Arena<ProductionId, ProductionNode>,
    by_name: HashMap<String, ProductionId>,
    /// Scratch list of join nodes to activate or retract for one fact.
    pending: Vec<JoinId>,
    trace: bool,
}

impl ReteNetwork {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            memory: WorkingMemory::default(),
            alphas: AlphaNetwork::new(config.predicate_index),
            joins: Arena::default(),
            tokens: TokenArena::default(),
            productions: Arena::default(),
            by_name: HashMap::new(),
            pending: Vec::new(),
            trace: config.trace_activations,
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Builds the join chain for a compiled production and brings it up to
    /// date with the facts already in working memory.
    ///
    /// The caller has checked that the name is free.
    pub fn install(&mut self, compiled: CompiledProduction) -> ProductionId {
        let CompiledProduction {
            name,
            conditions,
            filters,
        } = compiled;
        let production = self
            .productions
            .alloc(ProductionNode::new(name.clone(), filters));

        let mut chain: Vec<JoinId> = Vec::with_capacity(conditions.len());
        for (index, condition) in conditions.into_iter().enumerate() {
            let alpha = self
                .alphas
                .get_or_create(condition.pattern.key(), &self.memory);
            let join = self.joins.alloc(JoinNode::new(
                production,
                index,
                chain.last().copied(),
                alpha,
                condition.tests,
                condition.binds,
            ));
            self.alphas[alpha].successors.push(join);
            if let Some(&previous) = chain.last() {
                self.joins[previous].child = JoinChild::Join(join);
            }
            chain.push(join);
        }

        let first = chain.first().copied();
        self.productions[production].joins = chain;
        self.by_name.insert(name, production);

        if let Some(first) = first {
            self.left_activate(first, TokenArena::ROOT);
        }
        production
    }

    /// Removes a production, its join chain, its tokens, and any alpha memory
    /// that no longer feeds a join node. Returns false for an unknown name.
    pub fn uninstall(&mut self, name: &str) -> bool {
        let Some(production) = self.by_name.remove(name) else {
            return false;
        };
        let chain = self.productions[production].joins.clone();
        if let Some(&first) = chain.first() {
            let held: Vec<TokenId> = self.joins[first].tokens.values().copied().collect();
            for token in held {
                self.delete_token(token);
            }
        }
        for join in chain {
            if let Some(node) = self.joins.remove(join) {
                self.alphas.detach(node.alpha, join);
            }
        }
        self.productions.remove(production);
        true
    }

    // =========================================================================
    // Facts
    // =========================================================================

    /// Adds a fact and propagates it. Returns false if it was already present.
    ///
    /// The fact enters every matching alpha memory before any join node is
    /// activated; join tokens are keyed by (parent, fact), so a join reached
    /// both by left and right activation still holds one token.
    pub fn add_fact(&mut self, fact: Fact) -> bool {
        let Some(id) = self.memory.insert(fact) else {
            return false;
        };
        let mut pending = std::mem::take(&mut self.pending);
        self.alphas.insert_fact(&self.memory[id], id, &mut pending);
        for &join in &pending {
            self.right_activate(join, id);
        }
        pending.clear();
        self.pending = pending;
        true
    }

    /// Retracts a fact and every token built on it. Returns false if it was absent.
    pub fn remove_fact(&mut self, fact: &Fact) -> bool {
        let Some(id) = self.memory.id_of(fact) else {
            return false;
        };
        let mut pending = std::mem::take(&mut self.pending);
        self.alphas.remove_fact(fact, id, &mut pending);
        for &join in &pending {
            self.right_retract(join, id);
        }
        pending.clear();
        self.pending = pending;
        self.memory.release(id);
        true
    }

    /// Drops every fact and token, keeping the network structure.
    ///
    /// Equivalent to removing each fact in turn.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.alphas.clear_facts();
        for join in self.joins.values_mut() {
            join.clear();
        }
        self.tokens.clear();
        for production in self.productions.values_mut() {
            production.clear();
        }
    }

    // =========================================================================
    // Propagation
    // =========================================================================

    /// A fact arrived at the join's alpha memory: try it against every parent token.
    fn right_activate(&mut self, join: JoinId, fact: FactId) {
        if self.trace {
            trace!(join = join.raw(), fact = %self.memory[fact], "right activation");
        }
        let parents: Vec<TokenId> = match self.joins[join].parent {
            None => vec![TokenArena::ROOT],
            Some(parent) => self.joins[parent].tokens.values().copied().collect(),
        };
        for parent in parents {
            self.try_extend(join, parent, fact);
        }
    }

    /// A parent token appeared: try it against every fact in the join's alpha memory.
    fn left_activate(&mut self, join: JoinId, parent: TokenId) {
        if self.trace {
            trace!(join = join.raw(), token = parent.raw(), "left activation");
        }
        let alpha = self.joins[join].alpha;
        let facts: Vec<FactId> = self.alphas[alpha].facts.iter().copied().collect();
        for fact in facts {
            self.try_extend(join, parent, fact);
        }
    }

    fn try_extend(&mut self, join: JoinId, parent: TokenId, fact: FactId) {
        let node = &self.joins[join];
        if node.tokens.contains_key(&(parent, fact))
            || !node.passes(&self.tokens, &self.memory, parent, &self.memory[fact])
        {
            return;
        }
        let bindings = node.extend_bindings(&self.tokens[parent].bindings, &self.memory[fact]);
        let child = node.child;

        let token = self.tokens.extend(parent, fact, join, bindings);
        self.joins[join].hold(parent, fact, token);

        match child {
            JoinChild::Join(next) => self.left_activate(next, token),
            JoinChild::Production(production) => {
                let node = &mut self.productions[production];
                let accepted = node.activate(token, &self.tokens[token].bindings);
                if self.trace {
                    trace!(
                        production = %node.name,
                        token = token.raw(),
                        accepted,
                        "complete match"
                    );
                }
            }
        }
    }

    /// A fact left the join's alpha memory: delete every token it supports.
    fn right_retract(&mut self, join: JoinId, fact: FactId) {
        if self.trace {
            trace!(join = join.raw(), fact = %self.memory[fact], "right retraction");
        }
        let Some(held) = self.joins[join].by_fact.remove(&fact) else {
            return;
        };
        for token in held {
            self.delete_token(token);
        }
    }

    /// A parent token is going away: delete every token built on it, leaves first.
    fn left_retract(&mut self, parent: TokenId) {
        let descendants = self.tokens.subtree(parent);
        for token in descendants.into_iter().skip(1).rev() {
            self.unlink(token);
        }
    }

    fn delete_token(&mut self, token: TokenId) {
        if !self.tokens.contains(token) {
            return;
        }
        self.left_retract(token);
        self.unlink(token);
    }

    /// Frees one childless token and removes it from its join and terminal node.
    fn unlink(&mut self, id: TokenId) {
        let Some(token) = self.tokens.release(id) else {
            return;
        };
        let (Some(owner), Some(parent), Some(fact)) = (token.owner, token.parent, token.fact)
        else {
            return;
        };
        let Some(node) = self.joins.get_mut(owner) else {
            return;
        };
        node.release(parent, fact, id);
        if let JoinChild::Production(production) = node.child {
            if let Some(terminal) = self.productions.get_mut(production) {
                terminal.retract(id);
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn production(&self, name: &str) -> Option<&ProductionNode> {
        let id = self.by_name.get(name)?;
        self.productions.get(*id)
    }

    pub fn contains_production(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn bindings(&self, token: TokenId) -> &Bindings {
        &self.tokens[token].bindings
    }

    pub fn productions(&self) -> impl Iterator<Item = (ProductionId, &ProductionNode)> {
        self.productions.iter()
    }

    pub fn joins(&self) -> impl Iterator<Item = (JoinId, &JoinNode)> {
        self.joins.iter()
    }

    pub fn alphas(&self) -> impl Iterator<Item = (AlphaId, &AlphaMemory)> {
        self.alphas.iter()
    }

    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}
