//! Analysis modes and the request configuration sent to the analysis API.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest input set the backend ships with.
pub const MAX_LIMIT_DATA: u32 = 810;

/// Upper bound for I/O and CPU workers (per rank in MPI mode).
pub const MAX_WORKERS: u32 = 32;

/// Upper bound for MPI ranks.
pub const MAX_MPI_RANKS: u32 = 16;

/// Ranks used when an MPI request is built from a configuration without one.
pub const DEFAULT_MPI_RANKS: u32 = 4;

/// Backend analysis mode. Each mode is served by its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Thread pool for I/O, process pool for CPU work
    ThreadProcess,
    /// MPI ranks, each with its own thread and process pools
    Mpi,
}

impl Mode {
    pub fn path(&self) -> &'static str {
        match self {
            Mode::ThreadProcess => "/api/analyze/thread-process",
            Mode::Mpi => "/api/analyze/mpi",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::ThreadProcess => "thread-process",
            Mode::Mpi => "mpi",
        }
    }

    /// Message reported when the API fails without saying why.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Mode::ThreadProcess => "Analysis failed",
            Mode::Mpi => "MPI Analysis failed",
        }
    }

    /// Human-readable title, used in report headings.
    pub fn title(&self) -> &'static str {
        match self {
            Mode::ThreadProcess => "Thread + ProcessPool",
            Mode::Mpi => "MPI + ProcessPool",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one analysis request.
///
/// `mpi_ranks` is only meaningful in MPI mode; [`Configuration::body`] drops
/// it for thread-process requests and fills in [`DEFAULT_MPI_RANKS`] for MPI
/// requests that lack it, so a request never goes out with a required field
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub io_workers: u32,
    pub cpu_workers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpi_ranks: Option<u32>,
    pub limit_data: u32,
    #[serde(default = "default_detailed")]
    pub detailed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,
}

fn default_detailed() -> bool {
    true
}

impl Configuration {
    /// The form defaults for a mode.
    pub fn defaults(mode: Mode) -> Self {
        Self {
            io_workers: 3,
            cpu_workers: 2,
            mpi_ranks: match mode {
                Mode::ThreadProcess => None,
                Mode::Mpi => Some(DEFAULT_MPI_RANKS),
            },
            limit_data: MAX_LIMIT_DATA,
            detailed: true,
            nim: None,
        }
    }

    /// Ranks this configuration runs with in MPI mode.
    pub fn ranks(&self) -> u32 {
        self.mpi_ranks.unwrap_or(DEFAULT_MPI_RANKS)
    }

    /// Check every field against the range the API accepts for `mode`.
    pub fn validate(&self, mode: Mode) -> Result<(), String> {
        check_range("io_workers", self.io_workers, MAX_WORKERS)?;
        check_range("cpu_workers", self.cpu_workers, MAX_WORKERS)?;
        check_range("limit_data", self.limit_data, MAX_LIMIT_DATA)?;
        if mode == Mode::Mpi {
            check_range("mpi_ranks", self.ranks(), MAX_MPI_RANKS)?;
        }
        Ok(())
    }

    /// The JSON request body for `mode`.
    pub fn body(&self, mode: Mode) -> RequestBody<'_> {
        RequestBody {
            mpi_ranks: match mode {
                Mode::ThreadProcess => None,
                Mode::Mpi => Some(self.ranks()),
            },
            io_workers: self.io_workers,
            cpu_workers: self.cpu_workers,
            limit_data: self.limit_data,
            detailed: self.detailed,
            nim: self.nim.as_deref(),
        }
    }

    /// Short tag describing the worker layout, e.g. `3io/2cpu` or
    /// `4r/3io/2cpu`.
    pub fn tag(&self, mode: Mode) -> String {
        match mode {
            Mode::ThreadProcess => format!("{}io/{}cpu", self.io_workers, self.cpu_workers),
            Mode::Mpi => format!(
                "{}r/{}io/{}cpu",
                self.ranks(),
                self.io_workers,
                self.cpu_workers
            ),
        }
    }

    /// Label for a single run: the tag plus the input size, e.g.
    /// `3io/2cpu/810f`.
    pub fn run_label(&self, mode: Mode) -> String {
        format!("{}/{}f", self.tag(mode), self.limit_data)
    }
}

fn check_range(field: &str, value: u32, max: u32) -> Result<(), String> {
    if value == 0 || value > max {
        return Err(format!("{} must be between 1 and {}, got {}", field, max, value));
    }
    Ok(())
}

/// Wire form of a [`Configuration`] for one endpoint.
#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpi_ranks: Option<u32>,
    pub io_workers: u32,
    pub cpu_workers: u32,
    pub limit_data: u32,
    pub detailed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nim: Option<&'a str>,
}
