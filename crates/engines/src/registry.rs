//! Engine lookup and the failover policy.
//!
//! The registry is constructed once at startup and injected into the
//! orchestrator; there is no process-wide engine table.

use std::collections::HashMap;
use std::sync::Arc;

use mirage_core::engine::EngineKind;

use crate::adapter::{EngineAdapter, EngineSettings};
use crate::infinitetalk::InfiniteTalkAdapter;
use crate::wan2gp::Wan2gpAdapter;

/// Maps engine identifiers to adapter instances and owns the failover edge.
pub struct EngineRegistry {
    adapters: HashMap<EngineKind, Arc<dyn EngineAdapter>>,
    default_kind: EngineKind,
}

impl EngineRegistry {
    /// Build a registry around a default adapter. The default doubles as
    /// the resolution target for unknown identifiers.
    pub fn new(default_adapter: Arc<dyn EngineAdapter>) -> Self {
        let default_kind = default_adapter.kind();
        let mut adapters: HashMap<EngineKind, Arc<dyn EngineAdapter>> = HashMap::new();
        adapters.insert(default_kind, default_adapter);
        Self {
            adapters,
            default_kind,
        }
    }

    /// Register an additional adapter under its own identity.
    pub fn register(mut self, adapter: Arc<dyn EngineAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    /// The full production engine set: Wan2GP (default) plus InfiniteTalk.
    pub fn with_settings(settings: &EngineSettings) -> Self {
        Self::new(Arc::new(Wan2gpAdapter::new(settings.clone())))
            .register(Arc::new(InfiniteTalkAdapter::new(settings.clone())))
    }

    /// The engine used when a submission does not name one.
    pub fn default_kind(&self) -> EngineKind {
        self.default_kind
    }

    /// Resolve an engine identifier to its adapter.
    ///
    /// Unknown identifiers resolve to the default adapter. The HTTP
    /// boundary already rejects unrecognized names, so this path only
    /// covers records written by other means.
    pub fn resolve(&self, name: &str) -> Arc<dyn EngineAdapter> {
        match EngineKind::from_name(name) {
            Some(kind) => self.resolve_kind(kind),
            None => {
                tracing::warn!(engine = name, "Unknown engine identifier, using default");
                self.resolve_kind(self.default_kind)
            }
        }
    }

    /// Resolve a known engine kind, falling back to the default adapter if
    /// that kind was never registered.
    pub fn resolve_kind(&self, kind: EngineKind) -> Arc<dyn EngineAdapter> {
        self.adapters
            .get(&kind)
            .or_else(|| self.adapters.get(&self.default_kind))
            .cloned()
            .expect("registry always holds its default adapter")
    }

    /// The one-shot failover edge: InfiniteTalk falls back to Wan2GP, no
    /// other engine has a fallback. A single hard-coded edge bounds a job
    /// to at most two engine invocations.
    pub fn fallback_for(&self, kind: EngineKind) -> Option<EngineKind> {
        match kind {
            EngineKind::Infinitetalk => {
                self.adapters.contains_key(&EngineKind::Wan2gp).then_some(EngineKind::Wan2gp)
            }
            EngineKind::Wan2gp => None,
        }
    }
}
