//! Incremental Rete matching of named productions over triple facts.
//!
//! This crate provides:
//! - [`ReteEngine`] - Production registration, fact assertion/retraction, queries
//! - [`PatternCompiler`] - Validation and compilation of [`Production`]s
//! - [`Filter`] - Checks over a production's bound variables
//! - [`Bindings`] - Variable bindings of one match
//! - [`NetworkStats`] and [`NetworkTopology`] - Read-only diagnostics
//!
//! Facts flow through shared alpha memories (one per distinct condition
//! shape) into a chain of join nodes per production. Each join extends the
//! partial matches of its parent with facts from its alpha memory, so adding
//! or removing a fact only touches the tokens it affects.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod alpha;
mod arena;
mod config;
mod engine;
mod join;
mod memory;
mod network;
mod pattern;
mod production;
mod token;
mod topology;

pub use alpha::AlphaId;
pub use config::EngineConfig;
pub use engine::{EvaluationResult, ReteEngine};
pub use join::JoinId;
pub use pattern::{
    AlphaKey, CompiledCondition, CompiledProduction, Condition, ConditionPattern,
    CrossConditionTest, PatternCompiler, Production,
};
pub use production::{Filter, Operand, ProductionId};
pub use token::{Bindings, TokenId};
pub use topology::{NetworkStats, NetworkTopology, NodeRef, TopologyNode};

pub use reticle_foundation::{
    Error, ErrorContext, ErrorKind, Fact, Field, Result, Slot, Term, Variable,
};
