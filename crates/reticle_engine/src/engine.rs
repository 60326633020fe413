//! The engine facade.
//!
//! [`ReteEngine`] owns one network and exposes production registration, fact
//! assertion and retraction, bulk evaluation, and satisfaction queries. Every
//! call propagates to quiescence before returning. Engines are independent
//! values; nothing is shared between instances.

use std::collections::BTreeMap;
use std::fmt;

use reticle_foundation::{Error, Fact, Result};
use tracing::debug;

use crate::config::EngineConfig;
use crate::network::ReteNetwork;
use crate::pattern::{PatternCompiler, Production};
use crate::token::Bindings;
use crate::topology::{NetworkStats, NetworkTopology};

// =============================================================================
// Evaluation Result
// =============================================================================

/// Snapshot returned by [`ReteEngine::evaluate_batch`]: one binding set per
/// satisfied production, ordered by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    satisfied: BTreeMap<String, Bindings>,
}

impl EvaluationResult {
    /// Returns the reported bindings of a satisfied production.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Bindings> {
        self.satisfied.get(name)
    }

    /// Returns true if the production was satisfied.
    #[must_use]
    pub fn is_satisfied(&self, name: &str) -> bool {
        self.satisfied.contains_key(name)
    }

    /// Names of the satisfied productions, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.satisfied.keys().map(String::as_str)
    }

    /// Iterates `(name, bindings)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bindings)> {
        self.satisfied.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of satisfied productions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.satisfied.len()
    }

    /// Returns true if nothing was satisfied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.satisfied.is_empty()
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, bindings) in &self.satisfied {
            writeln!(f, "{name}: {bindings}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Rete Engine
// =============================================================================

/// An incremental matcher of named productions against a set of facts.
///
/// # Example
///
/// ```
/// use reticle_engine::{Fact, Production, ReteEngine};
///
/// let mut engine = ReteEngine::new();
/// engine.add_production(
///     Production::new("grandparent")
///         .when("?a", "parentOf", "?b")?
///         .when("?b", "parentOf", "?c")?,
/// )?;
/// engine.add_fact(Fact::parse("alfred", "parentOf", "betty")?);
/// engine.add_fact(Fact::parse("betty", "parentOf", "cathy")?);
///
/// let bindings = engine.get_bindings("grandparent").unwrap();
/// assert_eq!(bindings.get("?c").unwrap().as_str(), "cathy");
/// # Ok::<(), reticle_engine::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ReteEngine {
    config: EngineConfig,
    network: ReteNetwork,
}

impl Default for ReteEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReteEngine {
    /// Creates an empty engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an empty engine.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let network = ReteNetwork::new(&config);
        Self { config, network }
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Productions
    // =========================================================================

    /// Compiles and registers a production, then matches it against the
    /// facts already present.
    ///
    /// # Errors
    /// Returns `DuplicateProductionName` if the name is taken, or
    /// `MalformedPattern` if the production fails to compile. Either way the
    /// network is left unchanged.
    pub fn add_production(&mut self, production: Production) -> Result<()> {
        if self.network.contains_production(&production.name) {
            return Err(Error::duplicate_production(production.name));
        }
        let compiled = PatternCompiler::compile(&production)?;
        let conditions = compiled.conditions.len();
        self.network.install(compiled);
        debug!(
            production = %production.name,
            conditions,
            satisfied = self.is_satisfied(&production.name),
            "production registered"
        );
        Ok(())
    }

    /// Unregisters a production and drops the network nodes only it used.
    ///
    /// # Errors
    /// Returns `UnknownProductionName` if no production has this name.
    pub fn remove_production(&mut self, name: &str) -> Result<()> {
        if !self.network.uninstall(name) {
            return Err(Error::unknown_production(name));
        }
        debug!(production = name, "production removed");
        Ok(())
    }

    /// Returns true if a production with this name is registered.
    #[must_use]
    pub fn contains_production(&self, name: &str) -> bool {
        self.network.contains_production(name)
    }

    /// Names of every registered production, sorted.
    #[must_use]
    pub fn production_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .network
            .productions()
            .map(|(_, p)| p.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    // =========================================================================
    // Facts
    // =========================================================================

    /// Asserts a fact. Returns false if it was already present, in which case
    /// nothing changes.
    pub fn add_fact(&mut self, fact: Fact) -> bool {
        self.network.add_fact(fact)
    }

    /// Retracts a fact. Returns false if it was absent, in which case nothing
    /// changes.
    pub fn remove_fact(&mut self, fact: &Fact) -> bool {
        self.network.remove_fact(fact)
    }

    /// Asserts every fact and reports each satisfied production with one
    /// binding set.
    ///
    /// Facts already present are skipped; the engine is not reset first.
    pub fn evaluate_batch(&mut self, facts: impl IntoIterator<Item = Fact>) -> EvaluationResult {
        let mut added = 0usize;
        for fact in facts {
            if self.network.add_fact(fact) {
                added += 1;
            }
        }
        let result = self.snapshot();
        debug!(added, satisfied = result.len(), "batch evaluated");
        result
    }

    /// Retracts every fact. Productions stay registered.
    pub fn reset(&mut self) {
        let facts = self.network.memory().len();
        self.network.reset();
        debug!(facts, "engine reset");
    }

    /// Returns true if the fact is in working memory.
    #[must_use]
    pub fn contains_fact(&self, fact: &Fact) -> bool {
        self.network.memory().contains(fact)
    }

    /// Iterates working memory, in no particular order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.network.memory().iter().map(|(_, fact)| fact)
    }

    /// Number of facts in working memory.
    #[must_use]
    pub fn fact_count(&self) -> usize {
        self.network.memory().len()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Names of the productions with at least one surviving match, in no
    /// guaranteed order.
    #[must_use]
    pub fn satisfied_production_names(&self) -> Vec<&str> {
        self.network
            .productions()
            .filter(|(_, p)| p.is_satisfied())
            .map(|(_, p)| p.name.as_str())
            .collect()
    }

    /// Returns true if the production has a surviving match. Unknown names
    /// are not satisfied.
    #[must_use]
    pub fn is_satisfied(&self, name: &str) -> bool {
        self.network
            .production(name)
            .is_some_and(|p| p.is_satisfied())
    }

    /// One surviving binding set, or `None` if the production is unknown or
    /// unsatisfied.
    ///
    /// The same set is reported on every call until the next mutation.
    #[must_use]
    pub fn get_bindings(&self, name: &str) -> Option<Bindings> {
        let token = self.network.production(name)?.first_match()?;
        Some(self.network.bindings(token).clone())
    }

    /// Every surviving binding set. Empty if the production is unknown or
    /// unsatisfied.
    #[must_use]
    pub fn get_all_bindings(&self, name: &str) -> Vec<Bindings> {
        self.network
            .production(name)
            .map(|p| {
                p.matches()
                    .map(|token| self.network.bindings(token).clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Node and memory counts.
    #[must_use]
    pub fn stats(&self) -> NetworkStats {
        NetworkStats::of(&self.network)
    }

    /// Nodes and edges of the network.
    #[must_use]
    pub fn topology(&self) -> NetworkTopology {
        NetworkTopology::of(&self.network)
    }

    fn snapshot(&self) -> EvaluationResult {
        let satisfied = self
            .network
            .productions()
            .filter_map(|(_, p)| {
                let token = p.first_match()?;
                Some((p.name.clone(), self.network.bindings(token).clone()))
            })
            .collect();
        EvaluationResult { satisfied }
    }
}
