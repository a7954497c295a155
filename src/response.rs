//! Responses returned by the analysis API.
//!
//! The backend fills in whatever it managed to parse from the analysis run,
//! so every field is optional. Fields with an unexpected type decode as
//! `None` rather than failing the whole response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of a successful analysis request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalysisResponse {
    #[serde(default, deserialize_with = "lenient::bool")]
    pub success: Option<bool>,
    /// Wall-clock seconds the backend spent on the run.
    #[serde(default, deserialize_with = "lenient::f64")]
    pub execution_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient::stats")]
    pub stats: Option<Stats>,
    /// Raw stdout of the analysis run.
    #[serde(default, deserialize_with = "lenient::string")]
    pub output: Option<String>,
    /// Echo of the request configuration.
    #[serde(default)]
    pub config: Option<Value>,
    /// Anything else the backend sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Statistics parsed by the backend from the analysis output.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Stats {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub speedup: Option<f64>,
    /// Fraction in `[0, 1]`.
    #[serde(default, deserialize_with = "lenient::f64")]
    pub efficiency: Option<f64>,
    /// Files per second.
    #[serde(default, deserialize_with = "lenient::f64")]
    pub throughput: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub files_processed: Option<u64>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub parallel_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub sequential_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub total_words: Option<u64>,
}

impl AnalysisResponse {
    /// Look up a statistic, treating a missing `stats` object as missing.
    pub fn stat(&self, f: impl FnOnce(&Stats) -> Option<f64>) -> Option<f64> {
        self.stats.as_ref().and_then(f)
    }
}

/// `GET /` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Health {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub version: String,
}

/// `GET /api/status` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataStatus {
    #[serde(default)]
    pub data_dir_exists: bool,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub message: String,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The message carried in `detail`, if it has any text. Validation errors
    /// arrive as a list, which is reported as its JSON text.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

mod lenient {
    use super::*;

    pub fn f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_f64().filter(|v| v.is_finite()))
    }

    pub fn u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_u64())
    }

    pub fn bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_bool())
    }

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    pub fn stats<'de, D>(deserializer: D) -> Result<Option<Stats>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            // every field of Stats is lenient, so an object always decodes
            value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_response() {
        let response: AnalysisResponse = serde_json::from_value(json!({
            "success": true,
            "execution_time": 1.234,
            "speedup": 1.8,
            "stats": {
                "speedup": 1.8,
                "efficiency": 0.45,
                "throughput": 657.2,
                "files_processed": 810,
                "total_words": 123456,
                "sequential_time": 2.2,
                "parallel_time": 1.2
            },
            "output": "Speedup: 1.80x\n",
            "config": {"io_workers": 3}
        }))
        .unwrap();

        assert_eq!(response.success, Some(true));
        assert_eq!(response.execution_time, Some(1.234));
        let stats = response.stats.as_ref().unwrap();
        assert_eq!(stats.efficiency, Some(0.45));
        assert_eq!(stats.files_processed, Some(810));
        assert_eq!(stats.total_words, Some(123456));
        assert_eq!(response.output.as_deref(), Some("Speedup: 1.80x\n"));
        assert_eq!(response.extra.get("speedup"), Some(&json!(1.8)));
    }

    #[test]
    fn test_empty_object() {
        let response: AnalysisResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, AnalysisResponse::default());
    }

    #[test]
    fn test_wrong_types_are_absent() {
        let response: AnalysisResponse = serde_json::from_value(json!({
            "execution_time": "fast",
            "stats": {"speedup": null, "efficiency": "high", "throughput": [1]},
            "output": 42
        }))
        .unwrap();

        assert_eq!(response.execution_time, None);
        assert_eq!(response.output, None);
        assert_eq!(response.stats, Some(Stats::default()));
    }

    #[test]
    fn test_non_object_stats() {
        let response: AnalysisResponse =
            serde_json::from_value(json!({"stats": "n/a", "execution_time": 2})).unwrap();
        assert_eq!(response.stats, None);
        assert_eq!(response.execution_time, Some(2.0));
        assert_eq!(response.stat(|s| s.speedup), None);
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "boom"})).unwrap();
        assert_eq!(body.message().as_deref(), Some("boom"));

        let body: ErrorBody = serde_json::from_value(json!({"detail": null})).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_value(json!({"detail": ""})).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_value(json!({"other": 1})).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody =
            serde_json::from_value(json!({"detail": [{"msg": "field required"}]})).unwrap();
        assert_eq!(
            body.message().as_deref(),
            Some(r#"[{"msg":"field required"}]"#)
        );
    }
}
