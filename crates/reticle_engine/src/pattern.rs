//! Production patterns and their compilation into network form.
//!
//! A [`Production`] arrives as an ordered list of [`Condition`]s plus optional
//! [`Filter`]s. [`PatternCompiler`] validates it and derives, per condition,
//! the alpha-memory key, the cross-condition tests against earlier conditions,
//! and the variables the condition binds first. Compilation is pure: a rejected
//! production never touches the network.

use std::collections::{HashMap, HashSet};
use std::fmt;

use reticle_foundation::{Error, ErrorContext, Fact, Field, Result, Slot, Term, Variable};

use crate::production::{Filter, Operand};

// =============================================================================
// Input Types
// =============================================================================

/// One triple template: each position is a constant or a variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Subject position.
    pub subject: Slot,
    /// Predicate position.
    pub predicate: Slot,
    /// Object position.
    pub object: Slot,
}

impl Condition {
    /// Creates a condition from three slots.
    #[must_use]
    pub const fn new(subject: Slot, predicate: Slot, object: Slot) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Parses a condition from textual slots (see [`Slot::parse`]).
    ///
    /// # Errors
    /// Returns a malformed pattern error if any slot fails to parse.
    pub fn parse(subject: &str, predicate: &str, object: &str) -> Result<Self> {
        Ok(Self::new(
            Slot::parse(subject)?,
            Slot::parse(predicate)?,
            Slot::parse(object)?,
        ))
    }

    /// Returns the slot at the given position.
    #[must_use]
    pub const fn slot(&self, field: Field) -> &Slot {
        match field {
            Field::Subject => &self.subject,
            Field::Predicate => &self.predicate,
            Field::Object => &self.object,
        }
    }

    /// Returns the first field holding the given variable.
    #[must_use]
    pub fn field_of(&self, var: &Variable) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| self.slot(*f).as_variable() == Some(var))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// A named query: ordered conditions plus filters over the bound variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    /// Unique name within one engine.
    pub name: String,
    /// Conditions, matched in order.
    pub conditions: Vec<Condition>,
    /// Checks applied to each fully joined match.
    pub filters: Vec<Filter>,
}

impl Production {
    /// Creates a production with no conditions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Appends a condition.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Appends a filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Parses and appends a condition.
    ///
    /// # Errors
    /// Returns a malformed pattern error if any slot fails to parse.
    pub fn when(self, subject: &str, predicate: &str, object: &str) -> Result<Self> {
        let index = self.conditions.len();
        let condition = Condition::parse(subject, predicate, object).map_err(|e| {
            e.with_context(
                ErrorContext::new()
                    .with_production(self.name.clone())
                    .with_condition(index),
            )
        })?;
        Ok(self.condition(condition))
    }
}

// =============================================================================
// Compiled Types
// =============================================================================

/// Deduplication key of an alpha memory.
///
/// Holds the constant of each position and which positions must hold equal
/// values (a variable repeated inside one condition). Variable names do not
/// take part, so `?a p ?b` and `?x p ?y` share one alpha memory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlphaKey {
    constants: [Option<Term>; 3],
    same: Vec<(Field, Field)>,
}

impl AlphaKey {
    /// Returns the constant required at a position, if any.
    #[must_use]
    pub fn constant(&self, field: Field) -> Option<&Term> {
        self.constants[field.index()].as_ref()
    }

    /// Returns true if the fact passes every constant and equality check.
    #[must_use]
    pub fn matches(&self, fact: &Fact) -> bool {
        Field::ALL.into_iter().all(|field| {
            self.constant(field)
                .is_none_or(|term| term == fact.get(field))
        }) && self.same.iter().all(|(a, b)| fact.get(*a) == fact.get(*b))
    }
}

impl fmt::Display for AlphaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for field in Field::ALL {
            if field != Field::Subject {
                write!(f, " ")?;
            }
            match self.constant(field) {
                Some(term) => write!(f, "{term}")?,
                None => write!(f, "_")?,
            }
        }
        write!(f, ")")?;
        for (a, b) in &self.same {
            write!(f, " {a}={b}")?;
        }
        Ok(())
    }
}

/// A compiled condition: its slots with the constant/variable split fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionPattern {
    condition: Condition,
    key: AlphaKey,
}

impl ConditionPattern {
    /// Compiles one condition.
    #[must_use]
    pub fn new(condition: Condition) -> Self {
        let mut constants: [Option<Term>; 3] = [None, None, None];
        let mut same = Vec::new();
        for field in Field::ALL {
            match condition.slot(field) {
                Slot::Constant(term) => constants[field.index()] = Some(term.clone()),
                Slot::Variable(var) => {
                    if let Some(first) = condition.field_of(var).filter(|f| *f != field) {
                        same.push((first, field));
                    }
                }
            }
        }
        Self {
            condition,
            key: AlphaKey { constants, same },
        }
    }

    /// The source condition.
    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The alpha-memory key.
    #[must_use]
    pub const fn key(&self) -> &AlphaKey {
        &self.key
    }

    /// Returns true if the fact satisfies this condition on its own.
    #[must_use]
    pub fn matches(&self, fact: &Fact) -> bool {
        self.key.matches(fact)
    }
}

/// Equality test between the incoming fact and a fact earlier in the token chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossConditionTest {
    /// Variable shared by both conditions.
    pub variable: Variable,
    /// Position of the variable in the current condition.
    pub current_field: Field,
    /// Parent links to walk from the candidate token to the earlier fact.
    pub levels_up: usize,
    /// Position of the variable in the earlier condition.
    pub prior_field: Field,
}

/// Everything a join node needs for one condition.
#[derive(Clone, Debug)]
pub struct CompiledCondition {
    /// The condition pattern.
    pub pattern: ConditionPattern,
    /// Tests against earlier conditions.
    pub tests: Vec<CrossConditionTest>,
    /// Variables bound for the first time by this condition.
    pub binds: Vec<(Variable, Field)>,
}

/// A validated production ready to be installed.
#[derive(Clone, Debug)]
pub struct CompiledProduction {
    /// Production name.
    pub name: String,
    /// One entry per condition, in order.
    pub conditions: Vec<CompiledCondition>,
    /// Filters over the final bindings.
    pub filters: Vec<Filter>,
}

// =============================================================================
// Pattern Compiler
// =============================================================================

/// Compiles productions into network form.
pub struct PatternCompiler;

impl PatternCompiler {
    /// Validate and compile a production.
    ///
    /// # Errors
    /// Returns a malformed pattern error (with the production name and, where
    /// it applies, the condition index as context) if the production has no
    /// conditions, a literal in a subject or predicate position, an empty
    /// variable name, or a filter that cannot be evaluated against its bindings.
    pub fn compile(production: &Production) -> Result<CompiledProduction> {
        let context = || ErrorContext::new().with_production(production.name.clone());

        if production.name.is_empty() {
            return Err(Error::malformed_pattern("production name is empty"));
        }
        if production.conditions.is_empty() {
            return Err(
                Error::malformed_pattern("production has no conditions").with_context(context())
            );
        }

        let mut conditions = Vec::with_capacity(production.conditions.len());
        for (index, condition) in production.conditions.iter().enumerate() {
            Self::validate_condition(condition)
                .map_err(|e| e.with_context(context().with_condition(index)))?;
            let (tests, binds) = Self::join_tests(&production.conditions, index);
            conditions.push(CompiledCondition {
                pattern: ConditionPattern::new(condition.clone()),
                tests,
                binds,
            });
        }

        Self::validate_filters(production).map_err(|e| e.with_context(context()))?;

        Ok(CompiledProduction {
            name: production.name.clone(),
            conditions,
            filters: production.filters.clone(),
        })
    }

    fn validate_condition(condition: &Condition) -> Result<()> {
        for field in [Field::Subject, Field::Predicate] {
            if let Slot::Constant(term) = condition.slot(field) {
                if term.is_literal() {
                    return Err(Error::malformed_pattern(format!(
                        "literal {term} cannot appear in the {field} position"
                    )));
                }
            }
        }
        for field in Field::ALL {
            if let Slot::Variable(var) = condition.slot(field) {
                if var.name().is_empty() {
                    return Err(Error::malformed_pattern(format!(
                        "variable in the {field} position has no name"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Computes the cross-condition tests and first bindings for condition `index`.
    ///
    /// Each variable is tested against its most recent earlier occurrence. A
    /// variable repeated inside the same condition is tested once here; the
    /// alpha key already forces its positions to agree.
    fn join_tests(
        conditions: &[Condition],
        index: usize,
    ) -> (Vec<CrossConditionTest>, Vec<(Variable, Field)>) {
        let condition = &conditions[index];
        let mut tests = Vec::new();
        let mut binds = Vec::new();
        let mut seen = HashSet::new();

        for field in Field::ALL {
            let Some(var) = condition.slot(field).as_variable() else {
                continue;
            };
            if !seen.insert(var.clone()) {
                continue;
            }
            let prior = conditions[..index]
                .iter()
                .enumerate()
                .rev()
                .find_map(|(j, c)| c.field_of(var).map(|f| (j, f)));
            match prior {
                Some((j, prior_field)) => tests.push(CrossConditionTest {
                    variable: var.clone(),
                    current_field: field,
                    levels_up: index - 1 - j,
                    prior_field,
                }),
                None => binds.push((var.clone(), field)),
            }
        }
        (tests, binds)
    }

    fn validate_filters(production: &Production) -> Result<()> {
        // Variables that only ever sit in subject/predicate positions are
        // always bound to resources.
        let mut resource_only: HashMap<&Variable, bool> = HashMap::new();
        for condition in &production.conditions {
            for field in Field::ALL {
                if let Some(var) = condition.slot(field).as_variable() {
                    let entry = resource_only.entry(var).or_insert(true);
                    *entry &= field != Field::Object;
                }
            }
        }

        for filter in &production.filters {
            for operand in filter.operands() {
                let Operand::Variable(var) = operand else {
                    continue;
                };
                if !resource_only.contains_key(var) {
                    return Err(Error::malformed_pattern(format!(
                        "filter {filter} uses {var}, which no condition binds"
                    )));
                }
            }
            if let Some((var, literal)) = filter.variable_against_literal() {
                if resource_only.get(var).copied().unwrap_or(false) {
                    return Err(Error::malformed_pattern(format!(
                        "filter {filter} compares {var}, always a resource, with literal {literal}"
                    )));
                }
            }
        }
        Ok(())
    }
}
