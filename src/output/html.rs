//! Self-contained HTML report with one chart per metric.

use super::format::{format_pct, format_seconds, format_speedup, format_throughput};
use super::{ChartField, Report, ReportFormatter};
use std::io::{self, Write};

const CHART_COLOR: &str = "#3498db";

/// HTML report formatter.
///
/// Charts are drawn client-side with chart.js, loaded from a CDN. Time and
/// throughput are line charts, speedup and efficiency are bar charts. Points
/// are in record order and labelled by record name.
#[derive(Debug, Default)]
pub struct HtmlFormatter;

impl HtmlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for HtmlFormatter {
    fn write_report(&self, out: &mut dyn Write, report: &Report<'_>) -> io::Result<()> {
        let json_data = script_json(&serde_json::to_string(report.records)?);

        let mut canvases = String::new();
        let mut scripts = String::new();
        for field in ChartField::all() {
            canvases.push_str(&format!(
                r#"
            <div class="chart-container">
                <h3>{title}</h3>
                <canvas id="{key}Chart"></canvas>
            </div>"#,
                title = field.title(),
                key = field.key(),
            ));
            scripts.push_str(&format!(
                "\n        buildChart('{key}', '{kind}', '{label}');",
                key = field.key(),
                kind = field.kind().as_str(),
                label = field.label(),
            ));
        }

        let mut rows = String::new();
        for r in report.records {
            rows.push_str(&format!(
                "\n                <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&r.name),
                escape(&r.config),
                format_seconds(r.time),
                format_speedup(r.speedup),
                format_pct(r.efficiency),
                format_throughput(r.throughput),
            ));
        }

        write!(
            out,
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        * {{
            box-sizing: border-box;
        }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
            color: #333;
        }}
        h1 {{
            text-align: center;
            color: #2c3e50;
            margin-bottom: 10px;
        }}
        .subtitle {{
            text-align: center;
            color: #7f8c8d;
            margin-bottom: 30px;
        }}
        .container {{
            max-width: 1400px;
            margin: 0 auto;
        }}
        .chart-container {{
            background: white;
            border-radius: 8px;
            padding: 20px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .chart-row {{
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 20px;
            margin-bottom: 30px;
        }}
        @media (max-width: 900px) {{
            .chart-row {{
                grid-template-columns: 1fr;
            }}
        }}
        table {{
            width: 100%;
            border-collapse: collapse;
            background: white;
            border-radius: 8px;
            overflow: hidden;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        th, td {{
            padding: 12px 15px;
            text-align: right;
            border-bottom: 1px solid #ecf0f1;
        }}
        th {{
            background: {color};
            color: white;
            font-weight: 600;
        }}
        th:first-child, td:first-child {{
            text-align: left;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="subtitle">{subtitle}</div>

        <div class="chart-row">{canvases}
        </div>

        <table>
            <thead>
                <tr><th>Name</th><th>Config</th><th>Time</th><th>Speedup</th><th>Efficiency</th><th>Throughput</th></tr>
            </thead>
            <tbody>{rows}
            </tbody>
        </table>
    </div>

    <script>
        const data = {json_data};

        function buildChart(key, kind, label) {{
            const ctx = document.getElementById(key + 'Chart').getContext('2d');
            new Chart(ctx, {{
                type: kind,
                data: {{
                    labels: data.map(r => r.name),
                    datasets: [{{
                        label: label,
                        data: data.map(r => r[key]),
                        backgroundColor: '{color}80',
                        borderColor: '{color}',
                        borderWidth: 2,
                        fill: false
                    }}]
                }},
                options: {{
                    responsive: true,
                    plugins: {{ legend: {{ display: false }} }},
                    scales: {{
                        y: {{ beginAtZero: true, title: {{ display: true, text: label }} }}
                    }}
                }}
            }});
        }}
{scripts}
    </script>
</body>
</html>
"##,
            title = escape(report.title),
            subtitle = escape(report.subtitle),
            color = CHART_COLOR,
        )
    }
}

/// Escape text for an HTML element body.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON cannot close the surrounding `<script>` element.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::record;

    fn render(title: &str, records: &[crate::record::MetricsRecord]) -> String {
        let mut out = Vec::new();
        HtmlFormatter::new()
            .write_report(
                &mut out,
                &Report {
                    title,
                    subtitle: "thread-process",
                    records,
                },
            )
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_html_report() {
        let records = vec![record("2 Threads", 2.0, 1.0), record("4 Threads", 1.0, 2.0)];
        let html = render("Thread Scalability (I/O Workers)", &records);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Thread Scalability (I/O Workers)</title>"));
        assert!(html.contains("cdn.jsdelivr.net/npm/chart.js"));
        assert!(html.contains("buildChart('time', 'line', 'Time (seconds)');"));
        assert!(html.contains("buildChart('speedup', 'bar', 'Speedup (x)');"));
        assert!(html.contains("buildChart('efficiency', 'bar', 'Efficiency (%)');"));
        assert!(html.contains("buildChart('throughput', 'line', 'Files/Second');"));
        assert!(html.contains(r#""name":"2 Threads""#));
        assert!(html.contains("<td>4 Threads</td>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_html_escapes_names() {
        let records = vec![record("</script><b>", 1.0, 1.0)];
        let html = render("a & b", &records);

        assert!(html.contains("<title>a &amp; b</title>"));
        assert!(html.contains("<td>&lt;/script&gt;&lt;b&gt;</td>"));
        assert!(html.contains(r#""name":"<\/script><b>""#));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_html_one_canvas_per_chart_and_one_row_per_record() {
        let records = vec![
            record("2 Ranks", 3.0, 1.0),
            record("4 Ranks", 2.0, 1.5),
            record("8 Ranks", 1.0, 3.0),
        ];
        let html = render("MPI Ranks Scalability", &records);

        for key in ["time", "speedup", "efficiency", "throughput"] {
            assert_eq!(html.matches(&format!(r#"<canvas id="{key}Chart">"#)).count(), 1);
        }
        assert_eq!(html.matches("<tr><td>").count(), 3);
        assert!(html.contains("<td>8 Ranks</td><td>4io/2cpu</td><td>1.000s</td><td>3.00x</td>"));
    }

    #[test]
    fn test_html_empty() {
        let html = render("empty", &[]);
        assert!(html.contains("const data = [];"));
    }
}
