//! Number formatting utilities for reports.

/// Format seconds with millisecond precision (e.g., "1.234s").
pub fn format_seconds(secs: f64) -> String {
    format!("{:.3}s", secs)
}

/// Format a speedup factor (e.g., "1.80x").
pub fn format_speedup(value: f64) -> String {
    format!("{:.2}x", value)
}

/// Format a percentage with one decimal (e.g., "45.0%").
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a file rate (e.g., "657.20 files/s").
pub fn format_throughput(value: f64) -> String {
    format!("{:.2} files/s", value)
}

/// Format a count with thousands separators (e.g., "1,234,567").
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format an optional value, or "N/A" when missing.
pub fn or_na<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metrics() {
        assert_eq!(format_seconds(1.234), "1.234s");
        assert_eq!(format_seconds(0.0), "0.000s");
        assert_eq!(format_speedup(1.8), "1.80x");
        assert_eq!(format_pct(45.0), "45.0%");
        assert_eq!(format_pct(99.96), "100.0%");
        assert_eq!(format_throughput(657.2), "657.20 files/s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(123_456), "123,456");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some(2.5), format_seconds), "2.500s");
        assert_eq!(or_na(None::<f64>, format_seconds), "N/A");
    }
}
