//! Tokens (partial matches) and the bindings they carry.
//!
//! A token at join node `k` records the fact that satisfied condition `k` and
//! a handle to its parent token for conditions `0..k`. Bindings are flattened
//! into a persistent map, so extending a token shares structure with its parent.

use std::collections::HashSet;
use std::fmt;

use reticle_foundation::{Term, Variable};

use crate::arena::{Arena, arena_id};
use crate::join::JoinId;
use crate::memory::FactId;

arena_id!(
    /// Handle to a token in the network.
    TokenId
);

// =============================================================================
// Bindings
// =============================================================================

/// Variable bindings accumulated along a token chain.
///
/// Cloning is O(1).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: im::HashMap<Variable, Term>,
}

impl Bindings {
    /// Creates empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the value bound to a variable. Accepts `?x` or `x`.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&Term> {
        self.values.get(var.strip_prefix('?').unwrap_or(var))
    }

    /// Returns true if the variable is bound.
    #[must_use]
    pub fn contains(&self, var: &str) -> bool {
        self.get(var).is_some()
    }

    /// Returns new bindings with one more variable bound.
    #[must_use]
    pub fn bind(&self, var: Variable, value: Term) -> Self {
        Self {
            values: self.values.update(var, value),
        }
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate all bindings (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.values.iter()
    }

    /// Bindings sorted by variable name.
    #[must_use]
    pub fn to_vec(&self) -> Vec<(Variable, Term)> {
        let mut pairs: Vec<_> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort();
        pairs
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.to_vec()).finish()
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.to_vec().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var} → {value}")?;
        }
        write!(f, "}}")
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// A partial match through the first `k` conditions of one production.
#[derive(Clone, Debug)]
pub(crate) struct Token {
    /// Token for conditions `0..k-1`; `None` only for the root token.
    pub parent: Option<TokenId>,
    /// Fact that satisfied condition `k`; `None` only for the root token.
    pub fact: Option<FactId>,
    /// Join node holding this token; `None` only for the root token.
    pub owner: Option<JoinId>,
    pub bindings: Bindings,
    /// Tokens extending this one, so retraction never scans whole memories.
    pub children: HashSet<TokenId>,
}

/// Token storage. Slot 0 is the root token ("zero conditions matched"), which
/// exists for the lifetime of the network and is never retracted.
#[derive(Clone, Debug)]
pub(crate) struct TokenArena {
    tokens: Arena<TokenId, Token>,
}

impl Default for TokenArena {
    fn default() -> Self {
        let mut tokens = Arena::default();
        tokens.alloc(Self::root_token());
        Self { tokens }
    }
}

impl TokenArena {
    pub const ROOT: TokenId = TokenId(0);

    fn root_token() -> Token {
        Token {
            parent: None,
            fact: None,
            owner: None,
            bindings: Bindings::new(),
            children: HashSet::new(),
        }
    }

    /// Stores a token extending `parent` and links it as a child.
    ///
    /// Children of the root token are not tracked; the root is never retracted.
    pub fn extend(
        &mut self,
        parent: TokenId,
        fact: FactId,
        owner: JoinId,
        bindings: Bindings,
    ) -> TokenId {
        let id = self.tokens.alloc(Token {
            parent: Some(parent),
            fact: Some(fact),
            owner: Some(owner),
            bindings,
            children: HashSet::new(),
        });
        if parent != Self::ROOT {
            self.tokens[parent].children.insert(id);
        }
        id
    }

    /// Frees a token. Its children must already be gone.
    pub fn release(&mut self, id: TokenId) -> Option<Token> {
        debug_assert_ne!(id, Self::ROOT, "the root token is never released");
        let token = self.tokens.remove(id)?;
        if let Some(parent) = token.parent.filter(|p| *p != Self::ROOT) {
            if let Some(p) = self.tokens.get_mut(parent) {
                p.children.remove(&id);
            }
        }
        Some(token)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.tokens.get(id).is_some()
    }

    /// Walks `levels` parent links up from `id`.
    pub fn ancestor(&self, mut id: TokenId, levels: usize) -> TokenId {
        for _ in 0..levels {
            match self.tokens[id].parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        id
    }

    /// Collects `id` and all of its descendants, parents before children.
    pub fn subtree(&self, id: TokenId) -> Vec<TokenId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(t) = stack.pop() {
            order.push(t);
            stack.extend(self.tokens[t].children.iter().copied());
        }
        order
    }

    /// Number of tokens, excluding the root.
    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Drops every token except the root.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.tokens.alloc(Self::root_token());
    }
}

impl std::ops::Index<TokenId> for TokenArena {
    type Output = Token;

    fn index(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }
}
