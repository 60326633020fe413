//! Integration tests for Layer 1: Engine
//!
//! Tests for pattern compilation, the alpha/beta network, retraction, and filters.

mod filters;
mod retraction;
