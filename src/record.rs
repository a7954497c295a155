//! Chart-ready metrics for one completed analysis run.

use crate::request::{Configuration, Mode};
use crate::response::AnalysisResponse;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Metrics for one completed run.
///
/// Created once per successful request and never mutated afterwards. The
/// efficiency is stored as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub name: String,
    /// Seconds.
    pub time: f64,
    pub speedup: f64,
    /// Percent, `[0, 100]`.
    pub efficiency: f64,
    /// Files per second.
    pub throughput: f64,
    pub config: String,
    /// When the run completed, for records kept in a page history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Local>>,
}

impl MetricsRecord {
    /// Map an API response to a record. Any metric the response lacks is
    /// reported as zero.
    pub fn from_response(
        mode: Mode,
        config: &Configuration,
        response: &AnalysisResponse,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: label.into(),
            time: response.execution_time.unwrap_or(0.0),
            speedup: response.stat(|s| s.speedup).unwrap_or(0.0),
            efficiency: response.stat(|s| s.efficiency).unwrap_or(0.0) * 100.0,
            throughput: response.stat(|s| s.throughput).unwrap_or(0.0),
            config: config.tag(mode),
            timestamp: None,
        }
    }

    /// The same record, stamped with its completion time.
    pub fn completed_at(self, timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> AnalysisResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_thread_process_run() {
        let config = Configuration {
            io_workers: 3,
            cpu_workers: 2,
            mpi_ranks: None,
            limit_data: 810,
            detailed: true,
            nim: None,
        };
        let response = response(json!({
            "execution_time": 1.234,
            "stats": {"speedup": 1.8, "efficiency": 0.45, "throughput": 657.2}
        }));

        let record =
            MetricsRecord::from_response(Mode::ThreadProcess, &config, &response, "baseline");

        assert_eq!(record.name, "baseline");
        assert_eq!(record.time, 1.234);
        assert_eq!(record.speedup, 1.8);
        assert!((record.efficiency - 45.0).abs() < 1e-9);
        assert_eq!(record.throughput, 657.2);
        assert_eq!(record.config, "3io/2cpu");
        assert_eq!(record.timestamp, None);
    }

    #[test]
    fn test_mpi_run_without_stats() {
        let config = Configuration {
            io_workers: 3,
            cpu_workers: 2,
            mpi_ranks: Some(4),
            limit_data: 810,
            detailed: false,
            nim: None,
        };
        let response = response(json!({"execution_time": 3.5}));

        let record = MetricsRecord::from_response(Mode::Mpi, &config, &response, "mpi");

        assert_eq!(record.time, 3.5);
        assert_eq!(record.speedup, 0.0);
        assert_eq!(record.efficiency, 0.0);
        assert_eq!(record.throughput, 0.0);
        assert_eq!(record.config, "4r/3io/2cpu");
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let config = Configuration::defaults(Mode::ThreadProcess);
        let cases = [
            json!({}),
            json!({"stats": {}}),
            json!({"stats": {"speedup": 2.0}}),
            json!({"stats": {"efficiency": "n/a", "throughput": null}}),
        ];

        for case in cases {
            let record = MetricsRecord::from_response(
                Mode::ThreadProcess,
                &config,
                &response(case),
                "x",
            );
            for value in [record.time, record.efficiency, record.throughput] {
                assert_eq!(value, 0.0);
            }
            assert!(!record.speedup.is_nan());
        }
    }

    #[test]
    fn test_efficiency_is_percent() {
        let config = Configuration::defaults(Mode::ThreadProcess);
        for fraction in [0.0, 0.25, 0.5, 1.0] {
            let record = MetricsRecord::from_response(
                Mode::ThreadProcess,
                &config,
                &response(json!({"stats": {"efficiency": fraction}})),
                "x",
            );
            assert_eq!(record.efficiency, fraction * 100.0);
            assert!((0.0..=100.0).contains(&record.efficiency));
        }
    }

    #[test]
    fn test_mapping_is_repeatable() {
        let config = Configuration::defaults(Mode::Mpi);
        let response = response(json!({
            "execution_time": 0.5,
            "stats": {"speedup": 3.1, "efficiency": 0.77, "throughput": 100.0}
        }));

        let a = MetricsRecord::from_response(Mode::Mpi, &config, &response, "run");
        let b = MetricsRecord::from_response(Mode::Mpi, &config, &response, "run");
        assert_eq!(a, b);
    }

    #[test]
    fn test_completed_at() {
        let config = Configuration::defaults(Mode::ThreadProcess);
        let record = MetricsRecord::from_response(
            Mode::ThreadProcess,
            &config,
            &AnalysisResponse::default(),
            "x",
        );
        let now = Local::now();
        let stamped = record.clone().completed_at(now);
        assert_eq!(stamped.timestamp, Some(now));
        assert_eq!(stamped.name, record.name);
    }
}
