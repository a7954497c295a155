//! Page state for the single-run and comparison workflows.
//!
//! Each page owns its own form, history, busy flag and last error. Nothing
//! is shared between pages.

use crate::client::{Analyze, ClientError};
use crate::history::History;
use crate::preset::Preset;
use crate::record::MetricsRecord;
use crate::request::{Configuration, Mode};
use crate::response::AnalysisResponse;
use crate::suite::{Busy, BusyFlag, Suite, SuiteObserver, run_benchmark_suite};
use chrono::Local;

/// A thread-process or MPI analysis page: one form, one run at a time, and a
/// history of the runs that succeeded.
#[derive(Debug)]
pub struct SingleRunPage {
    mode: Mode,
    config: Configuration,
    history: History,
    busy: BusyFlag,
    last_response: Option<AnalysisResponse>,
    error: Option<String>,
}

impl SingleRunPage {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            config: Configuration::defaults(mode),
            history: History::new(),
            busy: BusyFlag::new(),
            last_response: None,
            error: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Edit the form directly.
    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Copy a preset's worker layout and input size into the form. The
    /// `detailed` flag is left as it was.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.config.io_workers = preset.io_workers;
        self.config.cpu_workers = preset.cpu_workers;
        self.config.limit_data = preset.limit_data;
        if self.mode == Mode::Mpi
            && let Some(ranks) = preset.mpi_ranks
        {
            self.config.mpi_ranks = Some(ranks);
        }
    }

    /// Submit the current form.
    ///
    /// On success the run is added to the history and returned. On failure
    /// the message is kept as the page error and the history is untouched.
    pub fn submit<A: Analyze + ?Sized>(
        &mut self,
        client: &A,
    ) -> Result<&MetricsRecord, ClientError> {
        self.error = None;
        self.last_response = None;

        let result = match self.busy.try_acquire() {
            Some(_guard) => self.run(client),
            None => Err(Busy.into()),
        };

        match result {
            Ok(record) => Ok(self.history.append(record)),
            Err(e) => {
                tracing::warn!(mode = %self.mode, error = %e, "analysis failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn run<A: Analyze + ?Sized>(&mut self, client: &A) -> Result<MetricsRecord, ClientError> {
        self.config
            .validate(self.mode)
            .map_err(ClientError::InvalidConfig)?;

        let response = client.submit(self.mode, &self.config)?;
        let record = MetricsRecord::from_response(
            self.mode,
            &self.config,
            &response,
            self.config.run_label(self.mode),
        )
        .completed_at(Local::now());

        tracing::info!(
            run = %record.name,
            time = record.time,
            speedup = record.speedup,
            efficiency = record.efficiency,
            "analysis completed"
        );

        self.last_response = Some(response);
        Ok(record)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Full response of the most recent successful run, if the last submit
    /// succeeded.
    pub fn last_response(&self) -> Option<&AnalysisResponse> {
        self.last_response.as_ref()
    }

    /// Message from the most recent failed submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// A handle for watching this page's busy state from elsewhere.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }
}

/// The comparison page: runs one of the fixed suites and keeps its results.
#[derive(Debug, Default)]
pub struct ComparisonPage {
    suite: Suite,
    results: Vec<MetricsRecord>,
    busy: BusyFlag,
}

impl ComparisonPage {
    pub fn new(suite: Suite) -> Self {
        Self {
            suite,
            ..Self::default()
        }
    }

    pub fn suite(&self) -> Suite {
        self.suite
    }

    pub fn set_suite(&mut self, suite: Suite) {
        self.suite = suite;
    }

    /// Run the selected suite to completion, replacing any previous results.
    pub fn run<A, O>(&mut self, client: &A, observer: &mut O) -> Result<&[MetricsRecord], Busy>
    where
        A: Analyze + ?Sized,
        O: SuiteObserver + ?Sized,
    {
        let _guard = self.busy.try_acquire().ok_or(Busy)?;

        self.results.clear();
        let presets = self.suite.presets();
        self.results = run_benchmark_suite(client, self.suite, &presets, observer);

        Ok(&self.results)
    }

    pub fn results(&self) -> &[MetricsRecord] {
        &self.results
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }
}
