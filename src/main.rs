use anyhow::Context;
use clap::{Parser, Subcommand};
use dashpipe::options::Options;
use dashpipe::provider::{Analytics, Query, RemoteHost, SeriesData, StackedData, TableData};
use dashpipe::{
    AnalyticsWidgets, Registry, RemoteHostWidgets, RenderPrimitive, RenderSurface, WidgetSpec,
};
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dashpipe")]
#[command(about = "Terminal dashboard widget pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind a dashboard declaration to the built-in fixture providers and
    /// print the shaped widgets.
    Render {
        /// Dashboard declaration file: { "widgets": [ { "kind", "options" } ] }
        #[arg(long)]
        dashboard: String,

        #[arg(long, default_value = "demo")]
        view_id: String,
    },
}

#[derive(Deserialize)]
struct Dashboard {
    widgets: Vec<WidgetSpec>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Render { dashboard, view_id } => {
            let text = std::fs::read_to_string(&dashboard)
                .with_context(|| format!("read dashboard file {}", dashboard))?;
            let dashboard: Dashboard = serde_json::from_str(&text)?;

            let now = time::OffsetDateTime::now_utc().date();
            let mut registry = Registry::new();
            AnalyticsWidgets::new(Arc::new(FixtureAnalytics), view_id, now).register(&mut registry);
            RemoteHostWidgets::new(Arc::new(FixtureHost)).register(&mut registry);

            // Phase 1: gather all widget data. A failed widget is skipped,
            // the rest of the dashboard still renders.
            let mut actions = Vec::new();
            for spec in &dashboard.widgets {
                match registry.dispatch(spec) {
                    Ok(action) => actions.push(action),
                    Err(err) => tracing::warn!(kind = %spec.kind, %err, "skipping widget"),
                }
            }

            // Phase 2: draw pass.
            let mut surface = TextSurface::default();
            for action in &actions {
                action.render(&mut surface)?;
            }
            print!("{}", surface.output);
        }
    }

    Ok(())
}

/// Deterministic sample data standing in for a real analytics transport.
struct FixtureAnalytics;

impl Analytics for FixtureAnalytics {
    fn realtime_users(&self, _view_id: &str) -> anyhow::Result<String> {
        Ok("42".to_string())
    }

    fn total_metric(&self, query: &Query) -> anyhow::Result<String> {
        Ok((128 * query.metrics.len() as i64).to_string())
    }

    fn bar_metric(&self, query: &Query) -> anyhow::Result<SeriesData> {
        let values = if query.filters.is_empty() {
            vec![12, 30, 22]
        } else {
            vec![4, 9, 7]
        };

        Ok(SeriesData {
            labels: vec!["01-01".into(), "01-02".into(), "01-03".into()],
            values,
        })
    }

    fn table(&self, query: &Query, first_header: &str) -> anyhow::Result<TableData> {
        let mut headers = vec![first_header.to_string()];
        headers.extend(query.metrics.iter().cloned());

        Ok(TableData {
            headers,
            labels: vec!["/home/".into(), "/blog/".into(), "/about/".into()],
            values: (1..=3)
                .map(|n| query.metrics.iter().map(|_| (n * 100).to_string()).collect())
                .collect(),
        })
    }

    fn stacked_bar(&self, _query: &Query) -> anyhow::Result<StackedData> {
        Ok(StackedData {
            labels: vec!["01-01".into(), "01-02".into(), "01-03".into()],
            series: vec![
                ("New Visitor".into(), vec![8, 21, 14]),
                ("Returning Visitor".into(), vec![4, 9, 8]),
            ],
        })
    }
}

/// Deterministic sample data standing in for a real remote host.
struct FixtureHost;

impl RemoteHost for FixtureHost {
    fn uptime_seconds(&self) -> anyhow::Result<i64> {
        Ok(3 * 86_400 + 7 * 3_600 + 20 * 60 + 5)
    }

    fn memory(&self, metrics: &[String], _unit: &str) -> anyhow::Result<Vec<i64>> {
        Ok((1..=metrics.len() as i64).map(|n| n * 1024).collect())
    }
}

/// A plain-text rendering surface for inspecting pipeline output.
#[derive(Default)]
struct TextSurface {
    output: String,
}

impl RenderSurface for TextSurface {
    fn queue(
        &mut self,
        primitive: &RenderPrimitive,
        title: &str,
        _options: &Options,
    ) -> anyhow::Result<()> {
        writeln!(self.output, "== {title}")?;
        match primitive {
            RenderPrimitive::Text(text) => writeln!(self.output, "{text}")?,
            RenderPrimitive::Bar { values, labels } => {
                for (label, value) in labels.iter().zip(values) {
                    writeln!(self.output, "{label:>12} {value}")?;
                }
            }
            RenderPrimitive::StackedBar {
                series,
                labels,
                colors,
            } => {
                writeln!(self.output, "labels: {}", labels.join(" "))?;
                for (idx, (name, values)) in series.iter().enumerate() {
                    let color = colors.get(idx).map(|c| c.name()).unwrap_or("default");
                    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                    writeln!(self.output, "{name} ({color}): {}", values.join(" "))?;
                }
            }
            RenderPrimitive::Table { rows } => {
                for row in rows {
                    writeln!(self.output, "{}", row.join(" | "))?;
                }
            }
        }
        writeln!(self.output)?;

        Ok(())
    }
}
