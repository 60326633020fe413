//! Reticle - Incremental Rete matching over triples
//!
//! This crate re-exports all layers of the Reticle system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: reticle_engine      — Pattern compiler, alpha/beta network, engine facade
//! Layer 0: reticle_foundation  — Core types (Term, Fact, Variable, Error)
//! ```

pub use reticle_engine as engine;
pub use reticle_foundation as foundation;
