//! Provider interface boundary: the data sources widget handlers fetch from.
//!
//! Implementations own all network and process I/O; the pipeline performs
//! none itself. Every fetch is a blocking call with no internal timeout or
//! retry, and a fetch failure is an opaque error passed through unchanged.

/// Hint for how a bar chart's axis labels should be rendered: points in time
/// or arbitrary dimension values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisLabels {
    #[default]
    Time,
    Dimension,
}

/// One ranged fetch against an analytics view. Dates are inclusive
/// YYYY-MM-DD strings; `start <= end` is not guaranteed and is the
/// provider's concern.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub view_id: String,
    pub start_date: String,
    pub end_date: String,
    pub time_period: String,
    pub global: bool,
    pub metrics: Vec<String>,
    pub dimensions: Vec<String>,
    pub filters: Vec<String>,
    pub orders: Vec<String>,
    pub row_limit: i64,
    pub axis: AxisLabels,
}

/// A single series: parallel label and value sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesData {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

/// Named value series sharing one label axis, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackedData {
    pub labels: Vec<String>,
    pub series: Vec<(String, Vec<i64>)>,
}

/// Raw table rows: header labels, one label per row, and a 2D value grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub labels: Vec<String>,
    pub values: Vec<Vec<String>>,
}

/// A web-analytics data source.
pub trait Analytics {
    /// Point-in-time active user count; no date range applies.
    fn realtime_users(&self, view_id: &str) -> anyhow::Result<String>;

    /// A single scalar metric summed over the query range.
    fn total_metric(&self, query: &Query) -> anyhow::Result<String>;

    /// One metric series over the range, bucketed by `time_period`.
    fn bar_metric(&self, query: &Query) -> anyhow::Result<SeriesData>;

    /// Tabular rows for the queried metrics and dimension.
    fn table(&self, query: &Query, first_header: &str) -> anyhow::Result<TableData>;

    /// Named series split by the queried dimension.
    fn stacked_bar(&self, query: &Query) -> anyhow::Result<StackedData>;
}

/// A remote host queried for machine stats.
pub trait RemoteHost {
    fn uptime_seconds(&self) -> anyhow::Result<i64>;

    /// One value per requested meminfo metric, in the given unit.
    fn memory(&self, metrics: &[String], unit: &str) -> anyhow::Result<Vec<i64>>;
}
