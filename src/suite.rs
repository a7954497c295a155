//! Sequential benchmark suites.
//!
//! A suite submits its presets one at a time and waits for each analysis to
//! finish before starting the next. The backend shares one machine between
//! all requests, so overlapping runs would distort each other's timings.

use crate::client::{Analyze, ClientError};
use crate::preset::{self, Preset};
use crate::record::MetricsRecord;
use crate::request::Mode;
use clap::ValueEnum;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Comparison suite selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Suite {
    /// Thread scalability: 2 to 16 I/O workers
    #[default]
    ThreadProcess,
    /// Process scalability: 2 to 16 CPU workers
    Process,
    /// MPI scalability: 2 to 8 ranks
    Mpi,
}

impl Suite {
    /// The endpoint this suite runs against.
    pub fn mode(&self) -> Mode {
        match self {
            Suite::ThreadProcess | Suite::Process => Mode::ThreadProcess,
            Suite::Mpi => Mode::Mpi,
        }
    }

    /// The fixed preset list for this suite.
    pub fn presets(&self) -> Vec<Preset> {
        match self {
            Suite::ThreadProcess => preset::thread_scalability(),
            Suite::Process => preset::process_scalability(),
            Suite::Mpi => preset::mpi_scalability(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Suite::ThreadProcess => "Thread Scalability (I/O Workers)",
            Suite::Process => "Process Scalability (CPU Workers)",
            Suite::Mpi => "MPI Ranks Scalability",
        }
    }
}

/// Progress callbacks for a running suite. All methods default to no-ops.
pub trait SuiteObserver {
    /// A preset is about to be submitted. `index` is 0-based.
    fn on_start(&mut self, _index: usize, _total: usize, _preset: &Preset) {}

    /// A preset completed and produced a record.
    fn on_record(&mut self, _record: &MetricsRecord) {}

    /// A preset failed and was skipped.
    fn on_skip(&mut self, _preset: &Preset, _error: &ClientError) {}
}

impl SuiteObserver for () {}

/// Run `presets` against `suite`'s endpoint, one after another.
///
/// Every request is sent with `detailed` set. A preset whose request fails is
/// logged and skipped; the rest still run. The result holds one record per
/// successful preset, in submission order, and is empty if every preset
/// failed.
pub fn run_benchmark_suite<A, O>(
    client: &A,
    suite: Suite,
    presets: &[Preset],
    observer: &mut O,
) -> Vec<MetricsRecord>
where
    A: Analyze + ?Sized,
    O: SuiteObserver + ?Sized,
{
    let mode = suite.mode();
    let total = presets.len();
    let mut records = Vec::with_capacity(total);

    tracing::info!(suite = ?suite, presets = total, "starting benchmark suite");

    for (index, preset) in presets.iter().enumerate() {
        observer.on_start(index, total, preset);

        let config = preset.configuration(true);
        match client.submit(mode, &config) {
            Ok(response) => {
                let record =
                    MetricsRecord::from_response(mode, &config, &response, preset.name.as_str());
                tracing::info!(
                    preset = %preset.name,
                    time = record.time,
                    speedup = record.speedup,
                    "preset completed"
                );
                observer.on_record(&record);
                records.push(record);
            }
            Err(e) => {
                tracing::warn!(preset = %preset.name, error = %e, "preset failed, skipping");
                observer.on_skip(preset, &e);
            }
        }
    }

    tracing::info!(
        suite = ?suite,
        completed = records.len(),
        skipped = total - records.len(),
        "benchmark suite finished"
    );

    records
}

/// Shared busy/idle indicator for a page.
///
/// Clones observe the same flag, so a progress display on another thread can
/// watch a run that is in flight.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the flag busy until the returned guard is dropped. Returns `None`
    /// if it is already busy.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }
}

/// Holds a [`BusyFlag`] busy; clears it on drop.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Returned when a page is asked to start while a run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a run is already in progress")]
pub struct Busy;
