//! Aligned text table formatter.

use super::format::{
    format_count, format_pct, format_seconds, format_speedup, format_throughput, or_na,
};
use super::{Detail, Report, ReportFormatter};
use std::io::{self, Write};

/// Width of the name column; longer names are not truncated.
const NAME_WIDTH: usize = 32;

/// Text table formatter.
#[derive(Debug, Default)]
pub struct TableFormatter;

impl TableFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for TableFormatter {
    fn write_report(&self, out: &mut dyn Write, report: &Report<'_>) -> io::Result<()> {
        writeln!(out, "{}", report.title)?;
        if !report.subtitle.is_empty() {
            writeln!(out, "{}", report.subtitle)?;
        }
        writeln!(out)?;

        if report.records.is_empty() {
            writeln!(out, "  no results")?;
            return Ok(());
        }

        let timestamps = report.records.iter().any(|r| r.timestamp.is_some());

        write!(
            out,
            "  {:<nw$} {:>12} {:>10} {:>9} {:>12} {:>18}",
            "name",
            "config",
            "time",
            "speedup",
            "efficiency",
            "throughput",
            nw = NAME_WIDTH
        )?;
        if timestamps {
            write!(out, " {:>10}", "completed")?;
        }
        writeln!(out)?;

        write!(
            out,
            "  {:-<nw$} {:->12} {:->10} {:->9} {:->12} {:->18}",
            "",
            "",
            "",
            "",
            "",
            "",
            nw = NAME_WIDTH
        )?;
        if timestamps {
            write!(out, " {:->10}", "")?;
        }
        writeln!(out)?;

        for r in report.records {
            write!(
                out,
                "  {:<nw$} {:>12} {:>10} {:>9} {:>12} {:>18}",
                r.name,
                r.config,
                format_seconds(r.time),
                format_speedup(r.speedup),
                format_pct(r.efficiency),
                format_throughput(r.throughput),
                nw = NAME_WIDTH
            )?;
            if timestamps {
                let completed = r
                    .timestamp
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                write!(out, " {:>10}", completed)?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;

        Ok(())
    }

    fn write_detail(&self, out: &mut dyn Write, detail: &Detail<'_>) -> io::Result<()> {
        let response = detail.response;
        let stats = response.stats.as_ref();

        writeln!(
            out,
            "{} ({})",
            detail.mode.title(),
            detail.config.run_label(detail.mode)
        )?;
        writeln!(out, "────────────────────────────")?;
        writeln!(
            out,
            "speedup      {}",
            or_na(stats.and_then(|s| s.speedup), format_speedup)
        )?;
        writeln!(
            out,
            "efficiency   {}",
            or_na(stats.and_then(|s| s.efficiency), |e| format_pct(e * 100.0))
        )?;
        writeln!(
            out,
            "throughput   {}",
            or_na(stats.and_then(|s| s.throughput), format_throughput)
        )?;
        writeln!(
            out,
            "exec time    {}",
            or_na(response.execution_time, format_seconds)
        )?;

        writeln!(
            out,
            "files        {}",
            stats
                .and_then(|s| s.files_processed)
                .unwrap_or(u64::from(detail.config.limit_data))
        )?;

        if let Some(stats) = stats {
            writeln!(out, "words        {}", or_na(stats.total_words, format_count))?;
            writeln!(
                out,
                "sequential   {}",
                or_na(stats.sequential_time, format_seconds)
            )?;
            writeln!(
                out,
                "parallel     {}",
                or_na(stats.parallel_time, format_seconds)
            )?;
        }
        writeln!(out)?;

        if detail.show_output
            && let Some(output) = response.output.as_deref()
        {
            writeln!(out, "output")?;
            writeln!(out, "──────")?;
            writeln!(out, "{}", output.trim_end())?;
            writeln!(out)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::record;
    use crate::request::{Configuration, Mode};
    use crate::response::AnalysisResponse;
    use chrono::{Local, TimeZone};
    use serde_json::json;

    fn render(report: &Report<'_>) -> String {
        let mut out = Vec::new();
        TableFormatter::new().write_report(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_rows_in_order() {
        let records = vec![record("2 Threads", 2.0, 1.0), record("4 Threads", 1.0, 2.0)];
        let text = render(&Report {
            title: "Thread Scalability (I/O Workers)",
            subtitle: "",
            records: &records,
        });

        assert!(text.starts_with("Thread Scalability (I/O Workers)\n"));
        let two = text.find("2 Threads").unwrap();
        let four = text.find("4 Threads").unwrap();
        assert!(two < four);
        assert!(text.contains("2.000s"));
        assert!(text.contains("2.00x"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("500.00 files/s"));
        assert!(!text.contains("completed"));
    }

    #[test]
    fn test_table_timestamps() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 13, 45, 7).unwrap();
        let records = vec![record("3io/2cpu/810f", 1.0, 1.0).completed_at(at)];
        let text = render(&Report {
            title: "history",
            subtitle: "",
            records: &records,
        });
        assert!(text.contains("completed"));
        assert!(text.contains("13:45:07"));
    }

    #[test]
    fn test_table_empty() {
        let text = render(&Report {
            title: "history",
            subtitle: "thread-process",
            records: &[],
        });
        assert!(text.contains("no results"));
    }

    #[test]
    fn test_detail() {
        let config = Configuration::defaults(Mode::ThreadProcess);
        let response: AnalysisResponse = serde_json::from_value(json!({
            "execution_time": 1.234,
            "stats": {"speedup": 1.8, "efficiency": 0.45, "total_words": 1234567},
            "output": "Speedup: 1.80x\n"
        }))
        .unwrap();

        let mut out = Vec::new();
        TableFormatter::new()
            .write_detail(
                &mut out,
                &Detail {
                    mode: Mode::ThreadProcess,
                    config: &config,
                    response: &response,
                    show_output: true,
                },
            )
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Thread + ProcessPool (3io/2cpu/810f)"));
        assert!(text.contains("speedup      1.80x"));
        assert!(text.contains("efficiency   45.0%"));
        assert!(text.contains("throughput   N/A"));
        assert!(text.contains("files        810"));
        assert!(text.contains("words        1,234,567"));
        assert!(text.contains("Speedup: 1.80x"));
    }
}
