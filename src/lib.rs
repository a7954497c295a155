//! hybrid-bench - driver for a parallel text-analysis API.
//!
//! Submits thread/process and MPI analysis runs to the backend, turns each
//! response into a flat metrics record, keeps per-page run history and runs
//! fixed scalability suites one preset at a time.

pub mod client;
pub mod config;
pub mod history;
pub mod output;
pub mod page;
pub mod preset;
pub mod record;
pub mod request;
pub mod response;
pub mod suite;

pub mod logging;

pub use client::{Analyze, ClientError, HttpClient};
pub use config::Config;
pub use history::History;
pub use page::{ComparisonPage, SingleRunPage};
pub use preset::Preset;
pub use record::MetricsRecord;
pub use request::{Configuration, Mode};
pub use response::AnalysisResponse;
pub use suite::{Suite, SuiteObserver, run_benchmark_suite};
