//! Engine configuration.

/// Configuration for a [`ReteEngine`](crate::ReteEngine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Index alpha memories by constant predicate. When false, every new or
    /// retracted fact is tested against every alpha memory.
    pub predicate_index: bool,
    /// Emit a `trace` event for every activation and retraction.
    pub trace_activations: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            predicate_index: true,
            trace_activations: false,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for debugging: every activation is traced.
    ///
    /// The predicate index stays on, so matching cost is unchanged. Use
    /// [`with_predicate_index(false)`](Self::with_predicate_index) for the
    /// linear-scan mode.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            predicate_index: true,
            trace_activations: true,
        }
    }

    /// Builder method to enable/disable the predicate index.
    #[must_use]
    pub fn with_predicate_index(mut self, enabled: bool) -> Self {
        self.predicate_index = enabled;
        self
    }

    /// Builder method to enable/disable activation tracing.
    #[must_use]
    pub fn with_trace_activations(mut self, enabled: bool) -> Self {
        self.trace_activations = enabled;
        self
    }
}
