//! Named, fixed configurations for one-click runs.

use crate::request::{Configuration, Mode};
use serde::{Deserialize, Serialize};

/// A named configuration bundled with the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpi_ranks: Option<u32>,
    pub io_workers: u32,
    pub cpu_workers: u32,
    pub limit_data: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,
}

impl Preset {
    fn new(name: &str, io_workers: u32, cpu_workers: u32, limit_data: u32) -> Self {
        Self {
            name: name.to_string(),
            mpi_ranks: None,
            io_workers,
            cpu_workers,
            limit_data,
            nim: None,
        }
    }

    fn mpi(name: &str, mpi_ranks: u32, io_workers: u32, cpu_workers: u32, limit_data: u32) -> Self {
        Self {
            mpi_ranks: Some(mpi_ranks),
            ..Self::new(name, io_workers, cpu_workers, limit_data)
        }
    }

    /// The request configuration for this preset.
    pub fn configuration(&self, detailed: bool) -> Configuration {
        Configuration {
            io_workers: self.io_workers,
            cpu_workers: self.cpu_workers,
            mpi_ranks: self.mpi_ranks,
            limit_data: self.limit_data,
            detailed,
            nim: self.nim.clone(),
        }
    }
}

/// Thread scalability: vary I/O workers.
pub fn thread_scalability() -> Vec<Preset> {
    [2, 4, 8, 12, 16]
        .into_iter()
        .map(|n| Preset::new(&format!("{} Threads", n), n, 2, 500))
        .collect()
}

/// Process scalability: vary CPU workers.
pub fn process_scalability() -> Vec<Preset> {
    [2, 4, 8, 12, 16]
        .into_iter()
        .map(|n| Preset::new(&format!("{} Processes", n), 4, n, 500))
        .collect()
}

/// MPI scalability: vary ranks.
pub fn mpi_scalability() -> Vec<Preset> {
    [2, 4, 8]
        .into_iter()
        .map(|n| Preset::mpi(&format!("{} Ranks", n), n, 4, 4, 500))
        .collect()
}

/// Quick presets offered on the single-run page for `mode`.
pub fn page_presets(mode: Mode) -> Vec<Preset> {
    match mode {
        Mode::ThreadProcess => vec![
            Preset::new("1. Baseline (NIM 237006081)", 3, 2, 810),
            Preset::new("2. Light (2/2)", 2, 2, 810),
            Preset::new("3. Medium (4/4)", 4, 4, 810),
            Preset::new("4. Balanced (8/8)", 8, 8, 810),
            Preset::new("5. I/O Heavy (16/4)", 16, 4, 810),
            Preset::new("6. CPU Heavy (4/16)", 4, 16, 810),
            Preset::new("7. High Parallelism (12/12)", 12, 12, 810),
            Preset::new("8. Test 500 files (6/6)", 6, 6, 500),
            Preset::new("9. Test 200 files (4/4)", 4, 4, 200),
            Preset::new("10. Quick Test 100 files", 2, 2, 100),
        ],
        Mode::Mpi => vec![
            Preset::mpi("1. Baseline (4 ranks)", 4, 3, 2, 810),
            Preset::mpi("2. Minimal (2 ranks)", 2, 4, 4, 810),
            Preset::mpi("3. Medium Scale (6 ranks)", 6, 3, 3, 810),
            Preset::mpi("4. High Scale (8 ranks)", 8, 2, 2, 810),
            Preset::mpi("5. Balanced (4/6/6)", 4, 6, 6, 810),
            Preset::mpi("6. High Parallelism (4/8/4)", 4, 8, 4, 810),
            Preset::mpi("7. CPU Heavy (4/2/8)", 4, 2, 8, 810),
            Preset::mpi("8. Medium Test (4 ranks/500)", 4, 4, 4, 500),
            Preset::mpi("9. Light Test (2 ranks/200)", 2, 3, 3, 200),
            Preset::mpi("10. Quick Test (2 ranks/100)", 2, 2, 2, 100),
        ],
    }
}

/// Find a preset by its 1-based position, exact name, or a case-insensitive
/// name fragment.
pub fn find<'a>(presets: &'a [Preset], query: &str) -> Option<&'a Preset> {
    let query = query.trim();
    if let Ok(n) = query.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| presets.get(i));
    }

    if let Some(preset) = presets.iter().find(|p| p.name == query) {
        return Some(preset);
    }

    let needle = query.to_lowercase();
    presets
        .iter()
        .find(|p| p.name.to_lowercase().contains(&needle))
}

/// `GET /api/presets` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemotePresets {
    #[serde(default)]
    pub thread_process: Vec<Preset>,
    #[serde(default)]
    pub mpi: Vec<Preset>,
}

impl RemotePresets {
    pub fn for_mode(&self, mode: Mode) -> &[Preset] {
        match mode {
            Mode::ThreadProcess => &self.thread_process,
            Mode::Mpi => &self.mpi,
        }
    }
}
