//! Error types for the Reticle system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout Reticle.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Reticle operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a duplicate production name error.
    #[must_use]
    pub fn duplicate_production(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateProductionName(name.into()))
    }

    /// Creates an unknown production name error.
    #[must_use]
    pub fn unknown_production(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownProductionName(name.into()))
    }

    /// Creates a malformed pattern error.
    #[must_use]
    pub fn malformed_pattern(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPattern {
            reason: reason.into(),
        })
    }

    /// Creates a malformed fact error.
    #[must_use]
    pub fn malformed_fact(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedFact {
            reason: reason.into(),
        })
    }

    /// Returns the production name recorded in this error's context, if any.
    #[must_use]
    pub fn production(&self) -> Option<&str> {
        self.context.as_ref()?.production.as_deref()
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A production with this name is already registered.
    #[error("duplicate production name: {0}")]
    DuplicateProductionName(String),

    /// No production with this name is registered.
    #[error("unknown production name: {0}")]
    UnknownProductionName(String),

    /// A condition or filter cannot be compiled into the network.
    #[error("malformed pattern: {reason}")]
    MalformedPattern {
        /// Why the pattern was rejected.
        reason: String,
    },

    /// A fact cannot be built from the given components.
    #[error("malformed fact: {reason}")]
    MalformedFact {
        /// Why the fact was rejected.
        reason: String,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Production being compiled or queried.
    pub production: Option<String>,
    /// Zero-based index of the offending condition.
    pub condition: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the production name.
    #[must_use]
    pub fn with_production(mut self, name: impl Into<String>) -> Self {
        self.production = Some(name.into());
        self
    }

    /// Sets the condition index.
    #[must_use]
    pub fn with_condition(mut self, index: usize) -> Self {
        self.condition = Some(index);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.production {
            write!(f, "in production {name}")?;
            if let Some(index) = self.condition {
                write!(f, " at condition {index}")?;
            }
        }
        Ok(())
    }
}
