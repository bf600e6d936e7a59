//! Analytics widget family: boxes, bars, stacked bars, and tables bound to
//! a web-analytics provider.
//!
//! Every bar variant funnels through [`AnalyticsWidgets::bar_metric`], every
//! table variant through [`AnalyticsWidgets::table`], and both stacked
//! variants through [`AnalyticsWidgets::stacked_bar`], so option precedence
//! and shaping are identical across variants. Specialized kinds differ only
//! in the option overlay they apply before delegating.

use crate::error::{Result, WidgetError};
use crate::options::{
    self, WidgetSpec, DEFAULT_CHAR_LIMIT, DEFAULT_METRIC, DEFAULT_ROW_LIMIT, OPTION_CHAR_LIMIT,
    OPTION_DIMENSION, OPTION_DIMENSIONS, OPTION_FILTERS, OPTION_GLOBAL, OPTION_METRIC,
    OPTION_ROW_LIMIT, OPTION_TITLE,
};
use crate::provider::{Analytics, AxisLabels, Query};
use crate::render::{DeferredRenderAction, RenderPrimitive};
use crate::shape;
use crate::widget::Registry;
use std::sync::Arc;
use time::Date;

// Widget kind identifiers.
pub const GA_BOX_REALTIME: &str = "ga.box_real_time";
pub const GA_BOX_TOTAL: &str = "ga.box_total";
pub const GA_BAR: &str = "ga.bar";
pub const GA_BAR_SESSIONS: &str = "ga.bar_sessions";
pub const GA_BAR_BOUNCES: &str = "ga.bar_bounces";
pub const GA_BAR_USERS: &str = "ga.bar_users";
pub const GA_BAR_RETURNING: &str = "ga.bar_returning";
pub const GA_BAR_NEW_RETURNING: &str = "ga.bar_new_returning";
pub const GA_BAR_PAGES: &str = "ga.bar_pages";
pub const GA_BAR_COUNTRIES: &str = "ga.bar_countries";
pub const GA_BAR_DEVICES: &str = "ga.bar_devices";
pub const GA_TABLE_PAGES: &str = "ga.table_pages";
pub const GA_TABLE_TRAFFIC_SOURCES: &str = "ga.table_traffic_sources";
pub const GA_TABLE: &str = "ga.table";

const DEFAULT_TABLE_METRICS: [&str; 4] =
    ["sessions", "page_views", "entrances", "unique_page_views"];
const DEFAULT_TABLE_DIMENSION: &str = "page_path";

/// Handlers for every analytics widget kind, bound to one view.
pub struct AnalyticsWidgets {
    provider: Arc<dyn Analytics>,
    view_id: String,
    now: Date,
}

impl AnalyticsWidgets {
    pub fn new(provider: Arc<dyn Analytics>, view_id: impl Into<String>, now: Date) -> Arc<Self> {
        Arc::new(Self {
            provider,
            view_id: view_id.into(),
            now,
        })
    }

    /// Register one handler per analytics widget kind.
    pub fn register(self: &Arc<Self>, registry: &mut Registry) {
        let entries: [(&str, fn(&AnalyticsWidgets, &WidgetSpec) -> Result<DeferredRenderAction>);
            14] = [
            (GA_BOX_REALTIME, Self::realtime_users),
            (GA_BOX_TOTAL, Self::total_metric),
            (GA_BAR, Self::bar),
            (GA_BAR_SESSIONS, Self::bar),
            (GA_BAR_BOUNCES, Self::bar_bounces),
            (GA_BAR_USERS, Self::bar_users),
            (GA_BAR_RETURNING, Self::bar_returning),
            (GA_BAR_NEW_RETURNING, Self::bar_new_returning),
            (GA_BAR_PAGES, Self::bar_pages),
            (GA_BAR_COUNTRIES, Self::bar_countries),
            (GA_BAR_DEVICES, Self::bar_devices),
            (GA_TABLE_PAGES, Self::table_pages),
            (GA_TABLE_TRAFFIC_SOURCES, Self::traffic_sources),
            (GA_TABLE, Self::table_by_dimension),
        ];

        for (kind, handler) in entries {
            let widgets = Arc::clone(self);
            registry.register(kind, Box::new(move |spec| handler(&widgets, spec)));
        }
    }

    /// Point-in-time active users; the only kind with no date range.
    fn realtime_users(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let title = options::title(&spec.options, " Real time users ");
        let users = self.provider.realtime_users(&self.view_id)?;

        Ok(DeferredRenderAction::new(
            RenderPrimitive::Text(users),
            title,
            spec.options.clone(),
        ))
    }

    fn total_metric(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let range = options::time_range(&spec.options, self.now)?;
        let metric = options::metric(&spec.options);
        let global = options::flag(&spec.options, OPTION_GLOBAL)?;
        let title = options::title(
            &spec.options,
            &shape::total_title(&metric, &range.start_iso(), &range.end_iso()),
        );

        let total = self.provider.total_metric(&Query {
            view_id: self.view_id.clone(),
            start_date: range.start_iso(),
            end_date: range.end_iso(),
            global,
            metrics: vec![metric],
            ..Query::default()
        })?;

        Ok(DeferredRenderAction::new(
            RenderPrimitive::Text(total),
            title,
            spec.options.clone(),
        ))
    }

    fn bar(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        self.bar_metric(spec, AxisLabels::Time)
    }

    fn bar_users(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec.with_forced(OPTION_METRIC, "users");
        self.bar_metric(&spec, AxisLabels::Time)
    }

    fn bar_returning(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec
            .with_forced(OPTION_METRIC, "users")
            .with_forced(OPTION_DIMENSIONS, "user_type")
            .with_default(OPTION_TITLE, " Returning users ");
        self.bar_metric(&spec, AxisLabels::Time)
    }

    fn bar_pages(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec
            .with_forced(OPTION_DIMENSIONS, "page_path")
            .with_forced(OPTION_METRIC, "page_views");

        // Hard precondition, checked before any fetch.
        let page_filter = spec
            .options
            .get(OPTION_FILTERS)
            .cloned()
            .unwrap_or_default();
        if page_filter.is_empty() {
            return Err(WidgetError::MissingRequiredOption {
                kind: spec.kind.clone(),
                option: OPTION_FILTERS.to_string(),
                hint: "relative url of your page, i.e '/my-super-page/'".to_string(),
            });
        }

        let spec = spec.with_default(OPTION_TITLE, &page_filter);
        self.bar_metric(&spec, AxisLabels::Time)
    }

    fn bar_countries(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec
            .with_forced(OPTION_DIMENSIONS, "country")
            .with_forced(OPTION_METRIC, "sessions");
        let filter = spec
            .options
            .get(OPTION_FILTERS)
            .cloned()
            .unwrap_or_default();
        let spec = spec.with_default(OPTION_TITLE, &filter);

        self.bar_metric(&spec, AxisLabels::Dimension)
    }

    fn bar_bounces(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec
            .with_forced(OPTION_METRIC, "bounces")
            .with_default(OPTION_TITLE, " Bounces ");
        self.bar_metric(&spec, AxisLabels::Time)
    }

    /// Shared bar routine: every bar variant ends up here.
    fn bar_metric(&self, spec: &WidgetSpec, axis: AxisLabels) -> Result<DeferredRenderAction> {
        let global = options::flag(&spec.options, OPTION_GLOBAL)?;
        let range = options::time_range(&spec.options, self.now)?;
        let time_period = options::time_period(&spec.options);
        let metric = options::metric(&spec.options);
        let title = options::title(&spec.options, &shape::bar_title(&metric, &time_period));

        let data = self.provider.bar_metric(&Query {
            view_id: self.view_id.clone(),
            start_date: range.start_iso(),
            end_date: range.end_iso(),
            time_period,
            global,
            metrics: vec![metric],
            dimensions: options::dimensions(&spec.options),
            filters: options::filters(&spec.options),
            axis,
            ..Query::default()
        })?;

        Ok(DeferredRenderAction::new(
            RenderPrimitive::Bar {
                values: data.values,
                labels: data.labels,
            },
            title,
            spec.options.clone(),
        ))
    }

    fn table_by_dimension(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let first_header = spec
            .options
            .get(OPTION_DIMENSION)
            .cloned()
            .unwrap_or_default();
        self.table(spec, &first_header)
    }

    fn table_pages(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        self.table(spec, "Page")
    }

    fn traffic_sources(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec.with_forced(OPTION_DIMENSION, "traffic_source");
        self.table(&spec, "Source")
    }

    /// Shared table routine: fetch rows, then shape them to the declared
    /// row and character limits.
    fn table(&self, spec: &WidgetSpec, first_header: &str) -> Result<DeferredRenderAction> {
        let global = options::flag(&spec.options, OPTION_GLOBAL)?;
        let dimension = options::dimension(&spec.options, DEFAULT_TABLE_DIMENSION);
        let metrics = options::metrics(&spec.options, &DEFAULT_TABLE_METRICS);
        let primary_metric = metrics
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_METRIC);
        let orders = options::orders(&spec.options, primary_metric);
        let row_limit = options::int(&spec.options, OPTION_ROW_LIMIT, DEFAULT_ROW_LIMIT)?;
        let char_limit = options::int(&spec.options, OPTION_CHAR_LIMIT, DEFAULT_CHAR_LIMIT)?;
        let range = options::time_range(&spec.options, self.now)?;
        let title = options::title(
            &spec.options,
            &shape::table_title(first_header, &range.start_iso(), &range.end_iso()),
        );

        let data = self.provider.table(
            &Query {
                view_id: self.view_id.clone(),
                start_date: range.start_iso(),
                end_date: range.end_iso(),
                global,
                metrics: metrics.clone(),
                dimensions: vec![dimension],
                filters: options::filters(&spec.options),
                orders,
                row_limit,
                ..Query::default()
            },
            first_header,
        )?;

        let rows = shape::format_table(row_limit, char_limit, &data.headers, &data.labels, &data.values);

        Ok(DeferredRenderAction::new(
            RenderPrimitive::Table { rows },
            title,
            spec.options.clone(),
        ))
    }

    fn bar_new_returning(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec.with_forced(OPTION_DIMENSIONS, "user_type");
        self.stacked_bar(&spec)
    }

    fn bar_devices(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let spec = spec.with_forced(OPTION_DIMENSIONS, "device_category");
        self.stacked_bar(&spec)
    }

    /// Shared stacked-bar routine: bounded series placement, palette
    /// assignment, and the composed default title.
    fn stacked_bar(&self, spec: &WidgetSpec) -> Result<DeferredRenderAction> {
        let range = options::time_range(&spec.options, self.now)?;
        let time_period = options::time_period(&spec.options);
        let metric = options::metric(&spec.options);
        let overrides = shape::color_overrides(&spec.options)?;

        let data = self.provider.stacked_bar(&Query {
            view_id: self.view_id.clone(),
            start_date: range.start_iso(),
            end_date: range.end_iso(),
            time_period,
            metrics: vec![metric.clone()],
            dimensions: options::dimensions(&spec.options),
            ..Query::default()
        })?;

        let series = shape::stacked_series(&data);
        let colors = shape::stacked_colors(series.len(), &overrides);
        let title = options::title(
            &spec.options,
            &shape::stacked_title(&metric, &series, &colors),
        );

        Ok(DeferredRenderAction::new(
            RenderPrimitive::StackedBar {
                series,
                labels: data.labels,
                colors,
            },
            title,
            spec.options.clone(),
        ))
    }
}
