//! Core terms, facts, and errors for Reticle.
//!
//! This crate provides:
//! - [`Term`] - Resource identifiers and literal values
//! - [`Variable`] and [`Slot`] - Tagged pattern positions
//! - [`Fact`] - Immutable (subject, predicate, object) triples
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod fact;
mod term;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use fact::Fact;
pub use term::{Field, Slot, Term, Variable};
