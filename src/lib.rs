//! Widget data-binding pipeline for terminal dashboards.
//!
//! A declarative list of widgets is bound to data pulled from pluggable
//! providers and shaped into renderer-ready primitives (text, bar chart,
//! stacked bar chart, table). Dispatch is two-phase: every widget's data is
//! fetched eagerly when its handler runs, and the returned
//! [`DeferredRenderAction`] draws it later, during the draw pass, so a
//! dashboard refresh presents a consistent snapshot.
//!
//! The pipeline performs no I/O of its own: providers (network, remote
//! hosts) and the rendering surface are external collaborators behind the
//! traits in [`provider`] and [`render`].

pub mod date;
pub mod error;
pub mod options;
pub mod provider;
pub mod render;
pub mod shape;
pub mod widget;

pub use date::{resolve_range, DateRange};
pub use error::{Result, WidgetError};
pub use options::WidgetSpec;
pub use render::{DeferredRenderAction, RenderPrimitive, RenderSurface};
pub use widget::{AnalyticsWidgets, Registry, RemoteHostWidgets};
