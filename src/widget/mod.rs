//! Widget dispatch: a kind-keyed handler table turning one declaration into
//! a "fetch now, render later" command.
//!
//! Handlers are registered once at startup. Dispatch is stateless and
//! synchronous: each call resolves options and dates, performs exactly one
//! provider fetch, and returns a deferred render action for the draw pass.
//! A hot reload simply re-runs dispatch from scratch.

pub mod analytics;
pub mod remote_host;

pub use analytics::AnalyticsWidgets;
pub use remote_host::RemoteHostWidgets;

use crate::error::{Result, WidgetError};
use crate::options::WidgetSpec;
use crate::render::DeferredRenderAction;
use std::collections::BTreeMap;
use tracing::debug;

/// A registered widget handler: declaration in, deferred render action out.
pub type Handler = Box<dyn Fn(&WidgetSpec) -> Result<DeferredRenderAction>>;

/// Kind identifier to handler mapping.
#[derive(Default)]
pub struct Registry {
    handlers: BTreeMap<String, Handler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: impl Into<String>, handler: Handler) {
        self.handlers.insert(kind.into(), handler);
    }

    /// Build the deferred render action for one widget. All five error
    /// categories surface here, synchronously; an unregistered kind fails
    /// before any fetch.
    pub fn dispatch(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let handler = self
            .handlers
            .get(&spec.kind)
            .ok_or_else(|| WidgetError::UnknownWidgetKind(spec.kind.clone()))?;

        debug!(kind = %spec.kind, "dispatching widget");
        handler(spec)
    }

    /// Registered kind identifiers, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}
