use clap::{Args, Parser, Subcommand};
use hybrid_bench::client::ClientError;
use hybrid_bench::config::{Config, DEFAULT_CONFIG};
use hybrid_bench::output::format::{format_pct, format_seconds, format_speedup};
use hybrid_bench::output::{Detail, OutputFormat, Report, create_formatter};
use hybrid_bench::{
    ComparisonPage, Configuration, HttpClient, MetricsRecord, Mode, Preset, SingleRunPage,
    Suite, SuiteObserver, logging, preset,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hybrid-bench")]
#[command(about = "Driver for the hybrid parallel text-analysis API")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base address of the analysis API (overrides the config file)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit single analysis runs and report the session history
    Run {
        /// Endpoint to submit to
        mode: Mode,

        /// Preset to apply and submit, by number or name (repeatable)
        #[arg(long = "preset", short)]
        presets: Vec<String>,

        #[command(flatten)]
        form: FormArgs,

        /// Include the backend's output log in the detail view
        #[arg(long)]
        show_output: bool,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Run a scalability suite, one preset at a time
    Compare {
        /// Suite to run
        #[arg(default_value = "thread-process")]
        suite: Suite,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// List presets
    Presets {
        /// Ask the API for its preset list instead of the built-in one
        #[arg(long)]
        remote: bool,
    },

    /// Show API health and data directory status
    Status,
}

/// Form fields. Explicit values take precedence over preset values.
#[derive(Args)]
struct FormArgs {
    /// I/O worker threads
    #[arg(long)]
    io_workers: Option<u32>,

    /// CPU worker processes
    #[arg(long)]
    cpu_workers: Option<u32>,

    /// MPI ranks (mpi mode only)
    #[arg(long)]
    mpi_ranks: Option<u32>,

    /// Number of input files to analyze
    #[arg(long)]
    limit_data: Option<u32>,

    /// Ask the backend to skip its detailed statistics
    #[arg(long)]
    no_detailed: bool,

    /// Student identifier forwarded to the backend
    #[arg(long)]
    nim: Option<String>,
}

impl FormArgs {
    fn apply(&self, config: &mut Configuration) {
        if let Some(n) = self.io_workers {
            config.io_workers = n;
        }
        if let Some(n) = self.cpu_workers {
            config.cpu_workers = n;
        }
        if let Some(n) = self.mpi_ranks {
            config.mpi_ranks = Some(n);
        }
        if let Some(n) = self.limit_data {
            config.limit_data = n;
        }
        if self.no_detailed {
            config.detailed = false;
        }
        if self.nim.is_some() {
            config.nim = self.nim.clone();
        }
    }
}

#[derive(Args)]
struct ReportArgs {
    /// Report format (table, json, html); defaults to the config file's
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", DEFAULT_CONFIG);
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(api) = &cli.api {
        config.api.base_url = api.clone();
    }

    logging::init(&config.logging);

    let client = HttpClient::from_config(&config.api);
    tracing::debug!(api = client.base_url(), "using analysis API");

    let Some(command) = cli.command else {
        return Err("no command given, see --help".into());
    };

    match command {
        Commands::Run {
            mode,
            presets,
            form,
            show_output,
            report,
        } => {
            let format = report.format.unwrap_or(config.output.format);
            let formatter = create_formatter(format);
            let builtin = preset::page_presets(mode);

            let mut page = SingleRunPage::new(mode);
            form.apply(page.config_mut());

            let steps = resolve_presets(&builtin, &presets)?;
            let total = steps.len();
            let mut failed = 0;

            for step in steps {
                if let Some(preset) = step {
                    page.apply_preset(preset);
                    form.apply(page.config_mut());
                    eprintln!("Preset: {}", preset.name);
                }

                eprintln!("Submitting {} ...", page.config().run_label(mode));
                match page.submit(&client) {
                    Ok(record) => eprintln!("  -> {}", summary(record)),
                    Err(e) => {
                        eprintln!("  -> ERROR: {}", e);
                        failed += 1;
                        continue;
                    }
                }

                if let Some(response) = page.last_response() {
                    formatter.write_detail(
                        &mut io::stderr().lock(),
                        &Detail {
                            mode,
                            config: page.config(),
                            response,
                            show_output,
                        },
                    )?;
                }
            }

            write_report(
                format,
                &Report {
                    title: mode.title(),
                    subtitle: "Run history",
                    records: page.history().records(),
                },
                report.output.as_deref(),
            )?;

            if failed == total {
                return Err(format!("all {} submissions failed", total).into());
            }
        }

        Commands::Compare { suite, report } => {
            let format = report.format.unwrap_or(config.output.format);
            let mut page = ComparisonPage::new(suite);

            eprintln!("Running {} against {}\n", suite.title(), client.base_url());
            let results = page.run(&client, &mut Progress)?;
            if results.is_empty() {
                tracing::warn!(suite = ?suite, "no preset completed");
            }

            write_report(
                format,
                &Report {
                    title: suite.title(),
                    subtitle: suite.mode().as_str(),
                    records: page.results(),
                },
                report.output.as_deref(),
            )?;
        }

        Commands::Presets { remote } => {
            let remote = if remote { Some(client.presets()?) } else { None };
            for mode in [Mode::ThreadProcess, Mode::Mpi] {
                let builtin;
                let presets = match &remote {
                    Some(remote) => remote.for_mode(mode),
                    None => {
                        builtin = preset::page_presets(mode);
                        &builtin[..]
                    }
                };
                print_presets(mode, presets);
            }
        }

        Commands::Status => {
            let health = client.health()?;
            println!("API:      {}", client.base_url());
            println!("Status:   {}", health.status);
            println!("Service:  {} {}", health.api, health.version);

            let status = client.data_status()?;
            println!(
                "Data:     {} ({} files)",
                if status.data_dir_exists {
                    "present"
                } else {
                    "missing"
                },
                status.file_count
            );
            if !status.message.is_empty() {
                println!("          {}", status.message);
            }
        }
    }

    Ok(())
}

/// Look up every `--preset` query before anything is submitted. No queries
/// means one submission of the form as edited.
fn resolve_presets<'a>(
    builtin: &'a [Preset],
    queries: &[String],
) -> Result<Vec<Option<&'a Preset>>, String> {
    if queries.is_empty() {
        return Ok(vec![None]);
    }

    let unknown: Vec<&str> = queries
        .iter()
        .filter(|q| preset::find(builtin, q).is_none())
        .map(|q| q.as_str())
        .collect();
    if !unknown.is_empty() {
        return Err(format!("unknown preset(s): {}", unknown.join(", ")));
    }

    Ok(queries
        .iter()
        .map(|q| preset::find(builtin, q))
        .collect())
}

/// Prints suite progress to stderr.
struct Progress;

impl SuiteObserver for Progress {
    fn on_start(&mut self, index: usize, total: usize, preset: &Preset) {
        eprintln!("[{}/{}] {}", index + 1, total, preset.name);
    }

    fn on_record(&mut self, record: &MetricsRecord) {
        eprintln!("  -> {}", summary(record));
    }

    fn on_skip(&mut self, _preset: &Preset, error: &ClientError) {
        eprintln!("  -> skipped: {}", error);
    }
}

fn summary(record: &MetricsRecord) -> String {
    format!(
        "{}, {} speedup, {} efficiency",
        format_seconds(record.time),
        format_speedup(record.speedup),
        format_pct(record.efficiency)
    )
}

fn print_presets(mode: Mode, presets: &[Preset]) {
    println!("{}:", mode.title());
    for preset in presets {
        let config = preset.configuration(true);
        println!("  {:<40} {}", preset.name, config.run_label(mode));
    }
    println!();
}

fn write_report(
    format: OutputFormat,
    report: &Report<'_>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let formatter = create_formatter(format);

    match output {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            formatter.write_report(&mut file, report)?;
            file.flush()?;
            eprintln!("Report written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            formatter.write_report(&mut out, report)?;
        }
    }

    Ok(())
}
