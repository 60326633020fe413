//! Terms, variables, and the tagged slots that pattern positions are built from.
//!
//! The textual convention (`?name` is a variable, `"text"` is a literal, anything
//! else is a resource identifier) is applied exactly once, by [`Slot::parse`] and
//! [`Term::parse`]. Everything downstream works on the tagged values.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// A triple component: a resource identifier or a literal value.
///
/// Cloning is O(1). Equality and hashing are by value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// Resource identifier, full or prefixed (`texai:Buster`).
    Iri(Arc<str>),
    /// Literal string value.
    Literal(Arc<str>),
}

impl Term {
    /// Creates a resource identifier term.
    #[must_use]
    pub fn iri(id: &str) -> Self {
        Self::Iri(id.into())
    }

    /// Creates a literal term.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Self::Literal(text.into())
    }

    /// Parses a constant term.
    ///
    /// `"text"` becomes a literal, anything else a resource identifier.
    ///
    /// # Errors
    /// Returns a malformed fact error for empty text, unterminated literals,
    /// and variables.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::malformed_fact("empty term"));
        }
        if text.starts_with('?') {
            return Err(Error::malformed_fact(format!(
                "variable {text} is not a constant term"
            )));
        }
        if let Some(rest) = text.strip_prefix('"') {
            let Some(inner) = rest.strip_suffix('"') else {
                return Err(Error::malformed_fact(format!(
                    "unterminated literal {text}"
                )));
            };
            return Ok(Self::literal(inner));
        }
        Ok(Self::iri(text))
    }

    /// Returns the identifier or literal text without decoration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Iri(s) | Self::Literal(s) => s,
        }
    }

    /// Returns true for resource identifiers.
    #[must_use]
    pub const fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    /// Returns true for literal values.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(s) => write!(f, "{s}"),
            Self::Literal(s) => write!(f, "{s:?}"),
        }
    }
}

/// A named pattern variable.
///
/// The name is stored without the leading `?`; `?x` and `x` name the same variable.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variable(Arc<str>);

impl Variable {
    /// Creates a variable, stripping one leading `?` if present.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.strip_prefix('?').unwrap_or(name).into())
    }

    /// Returns the bare name (no `?`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// One position of a condition: a constant to match or a variable to bind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slot {
    /// Must equal this term.
    Constant(Term),
    /// Binds (or joins on) this variable.
    Variable(Variable),
}

impl Slot {
    /// Parses a slot: `?name` is a variable, otherwise see [`Term::parse`].
    ///
    /// # Errors
    /// Returns a malformed pattern error for empty text, a bare `?`, or an
    /// unterminated literal.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(name) = text.strip_prefix('?') {
            if name.is_empty() {
                return Err(Error::malformed_pattern("variable without a name"));
            }
            return Ok(Self::Variable(Variable::new(name)));
        }
        Term::parse(text).map(Self::Constant).map_err(|e| match e.kind {
            ErrorKind::MalformedFact { reason } => Error::malformed_pattern(reason),
            kind => Error::new(kind),
        })
    }

    /// Returns true for variable slots.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns the variable, if this is a variable slot.
    #[must_use]
    pub const fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(v) => Some(v),
            Self::Constant(_) => None,
        }
    }

    /// Returns the constant, if this is a constant slot.
    #[must_use]
    pub const fn as_constant(&self) -> Option<&Term> {
        match self {
            Self::Constant(t) => Some(t),
            Self::Variable(_) => None,
        }
    }
}

impl From<Term> for Slot {
    fn from(term: Term) -> Self {
        Self::Constant(term)
    }
}

impl From<Variable> for Slot {
    fn from(var: Variable) -> Self {
        Self::Variable(var)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(t) => write!(f, "{t}"),
            Self::Variable(v) => write!(f, "{v}"),
        }
    }
}

/// A position within a triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field {
    /// First position.
    Subject,
    /// Second position.
    Predicate,
    /// Third position.
    Object,
}

impl Field {
    /// All fields in triple order.
    pub const ALL: [Field; 3] = [Field::Subject, Field::Predicate, Field::Object];

    /// Returns the zero-based position of this field.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Subject => 0,
            Self::Predicate => 1,
            Self::Object => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::Predicate => write!(f, "predicate"),
            Self::Object => write!(f, "object"),
        }
    }
}
