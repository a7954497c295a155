//! JSON output formatter.

use super::{Detail, Report, ReportFormatter};
use serde_json::json;
use std::io::{self, Write};

/// JSON formatter. A report is a pretty-printed array of records; the detail
/// view is the backend's response as received.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn write_report(&self, out: &mut dyn Write, report: &Report<'_>) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, report.records)?;
        writeln!(out)
    }

    fn write_detail(&self, out: &mut dyn Write, detail: &Detail<'_>) -> io::Result<()> {
        let value = json!({
            "mode": detail.mode,
            "config": detail.config.body(detail.mode),
            "response": detail.response,
        });
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)
    }
}
