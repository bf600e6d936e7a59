//! Remote-host widget family: machine stats from a host reached over a
//! command-execution provider.

use crate::error::Result;
use crate::options::{self, WidgetSpec, OPTION_UNIT};
use crate::provider::RemoteHost;
use crate::render::{DeferredRenderAction, RenderPrimitive};
use crate::shape;
use crate::widget::Registry;
use std::sync::Arc;

pub const RH_BOX_UPTIME: &str = "rh.box_uptime";
pub const RH_BAR_MEMORY: &str = "rh.bar_memory";

const DEFAULT_MEMORY_METRICS: [&str; 3] = ["MemTotal", "MemFree", "MemAvailable"];
const DEFAULT_UNIT: &str = "kb";

/// Handlers for every remote-host widget kind.
pub struct RemoteHostWidgets {
    provider: Arc<dyn RemoteHost>,
}

impl RemoteHostWidgets {
    pub fn new(provider: Arc<dyn RemoteHost>) -> Arc<Self> {
        Arc::new(Self { provider })
    }

    pub fn register(self: &Arc<Self>, registry: &mut Registry) {
        let entries: [(&str, fn(&RemoteHostWidgets, &WidgetSpec) -> Result<DeferredRenderAction>);
            2] = [
            (RH_BOX_UPTIME, Self::box_uptime),
            (RH_BAR_MEMORY, Self::bar_memory),
        ];

        for (kind, handler) in entries {
            let widgets = Arc::clone(self);
            registry.register(kind, Box::new(move |spec| handler(&widgets, spec)));
        }
    }

    /// Point-in-time uptime box; no date range applies.
    fn box_uptime(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let title = options::title(&spec.options, "Uptime");
        let uptime = self.provider.uptime_seconds()?;

        Ok(DeferredRenderAction::new(
            RenderPrimitive::Text(shape::format_uptime(uptime)),
            title,
            spec.options.clone(),
        ))
    }

    /// Memory bar: one value per meminfo metric, labeled by metric name.
    fn bar_memory(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let title = options::title(&spec.options, "Memory");
        let metrics = options::metrics(&spec.options, &DEFAULT_MEMORY_METRICS);
        let unit = spec
            .options
            .get(OPTION_UNIT)
            .cloned()
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());

        let values = self.provider.memory(&metrics, &unit)?;

        Ok(DeferredRenderAction::new(
            RenderPrimitive::Bar {
                values,
                labels: metrics,
            },
            title,
            spec.options.clone(),
        ))
    }
}
