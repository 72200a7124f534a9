//! Evaluation Context

use crate::PluginRegistry;
use std::sync::Arc;

/// Context passed to plugins: display preferences plus the registry that
/// dispatched the call
pub struct EvalContext {
    /// Render quantities with vulgar-fraction glyphs instead of decimals
    pub use_fractions: bool,
    /// Order unit suggestions imperial-first
    pub prefer_imperial: bool,
    pub registry: Arc<PluginRegistry>,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            use_fractions: true,
            prefer_imperial: true,
            registry,
        }
    }

    pub fn with_fractions(mut self, enabled: bool) -> Self {
        self.use_fractions = enabled;
        self
    }

    pub fn with_prefer_imperial(mut self, enabled: bool) -> Self {
        self.prefer_imperial = enabled;
        self
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new(Arc::new(PluginRegistry::new()))
    }
}
