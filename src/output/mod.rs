//! Rendering of run results.
//!
//! Provides three report formats:
//! - Table: aligned text table for the terminal
//! - Json: pretty-printed array of records
//! - Html: self-contained page with line and bar charts
//!
//! Every formatter takes the same input: an ordered slice of
//! [`MetricsRecord`]s. Charts pick one metric per chart through
//! [`ChartField`].

pub mod format;
mod html;
mod json;
mod table;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use table::TableFormatter;

use crate::record::MetricsRecord;
use crate::request::{Configuration, Mode};
use crate::response::AnalysisResponse;
use clap::ValueEnum;
use std::io::{self, Write};

/// Report format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table (default).
    #[default]
    Table,
    /// Pretty-printed JSON array.
    Json,
    /// HTML page with charts.
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!(
                "invalid format '{}', expected: table, json, html",
                s
            )),
        }
    }
}

/// How a metric is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
        }
    }
}

/// Field selector for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartField {
    Time,
    Speedup,
    Efficiency,
    Throughput,
}

impl ChartField {
    pub fn all() -> [ChartField; 4] {
        [
            ChartField::Time,
            ChartField::Speedup,
            ChartField::Efficiency,
            ChartField::Throughput,
        ]
    }

    /// Record field name, as it appears in JSON output.
    pub fn key(&self) -> &'static str {
        match self {
            ChartField::Time => "time",
            ChartField::Speedup => "speedup",
            ChartField::Efficiency => "efficiency",
            ChartField::Throughput => "throughput",
        }
    }

    /// Axis label.
    pub fn label(&self) -> &'static str {
        match self {
            ChartField::Time => "Time (seconds)",
            ChartField::Speedup => "Speedup (x)",
            ChartField::Efficiency => "Efficiency (%)",
            ChartField::Throughput => "Files/Second",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartField::Time => "Execution Time",
            ChartField::Speedup => "Speedup",
            ChartField::Efficiency => "Efficiency",
            ChartField::Throughput => "Throughput",
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartField::Time | ChartField::Throughput => ChartKind::Line,
            ChartField::Speedup | ChartField::Efficiency => ChartKind::Bar,
        }
    }

    pub fn value(&self, record: &MetricsRecord) -> f64 {
        match self {
            ChartField::Time => record.time,
            ChartField::Speedup => record.speedup,
            ChartField::Efficiency => record.efficiency,
            ChartField::Throughput => record.throughput,
        }
    }

    /// `(name, value)` points in record order.
    pub fn series<'a>(&self, records: &'a [MetricsRecord]) -> Vec<(&'a str, f64)> {
        records
            .iter()
            .map(|r| (r.name.as_str(), self.value(r)))
            .collect()
    }
}

/// A titled set of records to render.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub records: &'a [MetricsRecord],
}

/// Detail view of one analysis response.
#[derive(Debug, Clone, Copy)]
pub struct Detail<'a> {
    pub mode: Mode,
    pub config: &'a Configuration,
    pub response: &'a AnalysisResponse,
    /// Include the backend's raw output log.
    pub show_output: bool,
}

/// Trait for report formatters.
pub trait ReportFormatter {
    /// Write a report of all records.
    fn write_report(&self, out: &mut dyn Write, report: &Report<'_>) -> io::Result<()>;

    /// Write the detail view of the latest response (for formats that have
    /// one).
    fn write_detail(&self, _out: &mut dyn Write, _detail: &Detail<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// Create a formatter for the output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Html => Box::new(HtmlFormatter::new()),
    }
}
