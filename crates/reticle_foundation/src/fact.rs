//! Immutable (subject, predicate, object) triples.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::term::{Field, Term};

/// One triple in working memory.
///
/// Facts are compared and hashed by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact {
    /// Subject term.
    pub subject: Term,
    /// Predicate term.
    pub predicate: Term,
    /// Object term.
    pub object: Term,
}

impl Fact {
    /// Creates a fact from three terms.
    #[must_use]
    pub const fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Parses a fact from textual terms (see [`Term::parse`]).
    ///
    /// # Errors
    /// Returns a malformed fact error if any component is empty, an
    /// unterminated literal, or a variable.
    pub fn parse(subject: &str, predicate: &str, object: &str) -> Result<Self> {
        Ok(Self::new(
            Term::parse(subject)?,
            Term::parse(predicate)?,
            Term::parse(object)?,
        ))
    }

    /// Returns the term at the given position.
    #[must_use]
    pub const fn get(&self, field: Field) -> &Term {
        match field {
            Field::Subject => &self.subject,
            Field::Predicate => &self.predicate,
            Field::Object => &self.object,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}
