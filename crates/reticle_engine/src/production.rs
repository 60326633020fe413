//! Terminal nodes and the filters applied to fully joined matches.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use reticle_foundation::{Result, Slot, Term, Variable};

use crate::arena::arena_id;
use crate::join::JoinId;
use crate::token::{Bindings, TokenId};

arena_id!(
    /// Handle to a production (terminal) node.
    ProductionId
);

// =============================================================================
// Filters
// =============================================================================

/// One side of a filter comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Value bound to this variable.
    Variable(Variable),
    /// A fixed term.
    Constant(Term),
}

impl Operand {
    fn resolve<'a>(&'a self, bindings: &'a Bindings) -> Option<&'a Term> {
        match self {
            Self::Variable(var) => bindings.get(var.name()),
            Self::Constant(term) => Some(term),
        }
    }
}

impl From<Slot> for Operand {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Variable(var) => Self::Variable(var),
            Slot::Constant(term) => Self::Constant(term),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(var) => write!(f, "{var}"),
            Self::Constant(term) => write!(f, "{term}"),
        }
    }
}

/// A boolean check over a production's bound variables, evaluated only once
/// every condition is bound.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Both sides must be identical.
    Equal(Operand, Operand),
    /// The sides must differ.
    NotEqual(Operand, Operand),
}

impl Filter {
    /// Parses an identity filter from textual slots.
    ///
    /// # Errors
    /// Returns a malformed pattern error if either side fails to parse.
    pub fn equal(left: &str, right: &str) -> Result<Self> {
        Ok(Self::Equal(
            Slot::parse(left)?.into(),
            Slot::parse(right)?.into(),
        ))
    }

    /// Parses an inequality filter from textual slots.
    ///
    /// # Errors
    /// Returns a malformed pattern error if either side fails to parse.
    pub fn not_equal(left: &str, right: &str) -> Result<Self> {
        Ok(Self::NotEqual(
            Slot::parse(left)?.into(),
            Slot::parse(right)?.into(),
        ))
    }

    /// Both operands.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        let (Self::Equal(a, b) | Self::NotEqual(a, b)) = self;
        [a, b].into_iter()
    }

    /// Returns the variable and literal if this filter compares one against the other.
    #[must_use]
    pub fn variable_against_literal(&self) -> Option<(&Variable, &Term)> {
        let (Self::Equal(a, b) | Self::NotEqual(a, b)) = self;
        match (a, b) {
            (Operand::Variable(var), Operand::Constant(term))
            | (Operand::Constant(term), Operand::Variable(var))
                if term.is_literal() =>
            {
                Some((var, term))
            }
            _ => None,
        }
    }

    /// Evaluates the filter. An unbound variable fails the filter.
    #[must_use]
    pub fn accepts(&self, bindings: &Bindings) -> bool {
        let (Self::Equal(a, b) | Self::NotEqual(a, b)) = self;
        let (Some(left), Some(right)) = (a.resolve(bindings), b.resolve(bindings)) else {
            return false;
        };
        match self {
            Self::Equal(..) => left == right,
            Self::NotEqual(..) => left != right,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal(a, b) => write!(f, "{a} = {b}"),
            Self::NotEqual(a, b) => write!(f, "{a} != {b}"),
        }
    }
}

// =============================================================================
// Production Node
// =============================================================================

/// Terminal node for one production.
///
/// Holds the tokens of the last join node, split into those that pass every
/// filter and those that do not. Rejected tokens go no further.
#[derive(Clone, Debug)]
pub(crate) struct ProductionNode {
    pub name: String,
    pub filters: Vec<Filter>,
    /// Join chain, in condition order.
    pub joins: Vec<JoinId>,
    accepted: BTreeSet<TokenId>,
    rejected: HashSet<TokenId>,
}

impl ProductionNode {
    pub fn new(name: String, filters: Vec<Filter>) -> Self {
        Self {
            name,
            filters,
            joins: Vec::new(),
            accepted: BTreeSet::new(),
            rejected: HashSet::new(),
        }
    }

    /// Receives a fully joined token. Returns true if it was accepted.
    pub fn activate(&mut self, token: TokenId, bindings: &Bindings) -> bool {
        if self.filters.iter().all(|f| f.accepts(bindings)) {
            self.accepted.insert(token)
        } else {
            self.rejected.insert(token);
            false
        }
    }

    /// Forgets a retracted token. Returns true if it was an accepted match.
    pub fn retract(&mut self, token: TokenId) -> bool {
        self.rejected.remove(&token);
        self.accepted.remove(&token)
    }

    pub fn is_satisfied(&self) -> bool {
        !self.accepted.is_empty()
    }

    /// The surviving match with the lowest handle; stable until the next mutation.
    pub fn first_match(&self) -> Option<TokenId> {
        self.accepted.first().copied()
    }

    pub fn matches(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.accepted.iter().copied()
    }

    pub fn match_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn clear(&mut self) {
        self.accepted.clear();
        self.rejected.clear();
    }
}
