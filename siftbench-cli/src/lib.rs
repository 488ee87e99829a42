#![warn(missing_docs)]
//! Siftbench CLI
//!
//! Command-line driver for the benchmark: flag parsing, configuration
//! validation, query-source decoding, the connection preflight, and the
//! run itself: partition, execute, analyze, report. Setup failures exit
//! non-zero before any request is dispatched; a run that reaches the join
//! barrier always produces a report.

mod config;
mod remote;

pub use config::{BenchConfig, ConfigError, SearchParamsDoc, TuningDoc};
pub use remote::RemoteClient;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use siftbench_core::{execute, partition, Query, SearchClient};
use siftbench_data::{load_json_vectors, random_vectors, read_matrix, DecodeError};
use siftbench_report::{write_json, write_text, OutputFormat, Results};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Siftbench command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "siftbench")]
#[command(author, version, about = "Load-testing harness for remote vector search services")]
pub struct Cli {
    /// Origin of the search service, e.g. http://localhost:19530
    #[arg(short = 'u', long)]
    pub origin: String,

    /// Query vectors: path to a .json or .npy file, or an inline JSON
    /// array of vectors. Omit to generate random vectors with --dim
    #[arg(short = 'q', long)]
    pub queries: Option<String>,

    /// Generate random unit query vectors of this dimension instead of
    /// reading a query document
    #[arg(long, conflicts_with = "queries")]
    pub dim: Option<usize>,

    /// Number of distinct random query vectors generated with --dim
    #[arg(long, default_value = "1000")]
    pub nq: usize,

    /// Seed for random query-vector generation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Search-parameter document (JSON): collection_name, index_type,
    /// metric_type, params, limit, expr, output_fields
    #[arg(short = 's', long)]
    pub search_params: String,

    /// Number of parallel workers issuing queries
    #[arg(short = 'p', long, default_value = "1")]
    pub parallel: usize,

    /// Total number of search requests to issue
    #[arg(short = 't', long, default_value = "1")]
    pub total: usize,

    /// Output format, one of [text, json]
    #[arg(short = 'f', long, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Connection-establishment timeout in seconds, applied once before
    /// dispatch
    #[arg(long, default_value = "20")]
    pub dial_timeout: u64,

    /// Abort the run early once this fraction of requests has failed
    /// (0 < ratio <= 1); the report is then clearly marked partial
    #[arg(long)]
    pub abort_failures: Option<f64>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Assemble the immutable run configuration from the parsed flags.
    pub fn into_config(self) -> Result<BenchConfig, ConfigError> {
        let request = SearchParamsDoc::parse(&self.search_params)?.resolve()?;
        let config = BenchConfig {
            origin: self.origin,
            request,
            total: self.total,
            parallel: self.parallel,
            dial_timeout: Duration::from_secs(self.dial_timeout),
            abort_failure_ratio: self.abort_failures,
            format: self.format,
            output: self.output,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Run the siftbench CLI. This is the entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("siftbench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("siftbench=info")
            .init();
    }

    let source = QuerySource::from_flags(&cli)?;
    let config = cli.into_config()?;
    let vectors = source.vectors()?;
    tracing::info!(
        queries = vectors.len(),
        dim = vectors[0].len(),
        total = config.total,
        parallel = config.parallel,
        "loaded query vectors"
    );

    let client = RemoteClient::connect(&config.origin, config.dial_timeout)?;
    let results = run_benchmark(&client, &config, &vectors);
    write_report(&results, &config)?;

    if results.aborted {
        anyhow::bail!("run aborted early: failure budget exceeded, report is partial");
    }
    Ok(())
}

/// Partition, execute, and analyze one run against an already-connected
/// client.
///
/// Query emission cycles over `vectors` in order, one vector per request;
/// `vectors` must be non-empty unless `config.total` is zero.
pub fn run_benchmark<C: SearchClient>(
    client: &C,
    config: &BenchConfig,
    vectors: &[Vec<f32>],
) -> Results {
    let mut next = 0usize;
    let queues = partition(config.total, config.parallel, || {
        let vector = vectors[next % vectors.len()].clone();
        next += 1;
        Query::single(vector)
    });

    let bar = ProgressBar::new(config.total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let progressed = ProgressClient {
        inner: client,
        bar: &bar,
    };
    let run = execute(
        &progressed,
        &config.request,
        queues,
        config.abort_failure_ratio,
    );
    bar.finish_and_clear();

    Results::from_run(config.total, config.parallel, &run)
}

/// Decorator ticking the progress bar as requests complete.
struct ProgressClient<'a, C: SearchClient> {
    inner: &'a C,
    bar: &'a ProgressBar,
}

impl<C: SearchClient> SearchClient for ProgressClient<'_, C> {
    fn search(
        &self,
        request: &siftbench_core::SearchRequest,
        vectors: &[Vec<f32>],
    ) -> Result<siftbench_core::SearchResults, siftbench_core::ClientError> {
        let outcome = self.inner.search(request, vectors);
        self.bar.inc(1);
        outcome
    }
}

/// Where a run's query vectors come from: a document on disk (or inline),
/// or seeded random generation.
enum QuerySource {
    Document(String),
    Random { nq: usize, dim: usize, seed: u64 },
}

impl QuerySource {
    fn from_flags(cli: &Cli) -> Result<Self, ConfigError> {
        match (&cli.queries, cli.dim) {
            (Some(locator), _) => Ok(QuerySource::Document(locator.clone())),
            (None, Some(dim)) => {
                if dim == 0 || cli.nq == 0 {
                    return Err(ConfigError::BadRandomQueries);
                }
                Ok(QuerySource::Random {
                    nq: cli.nq,
                    dim,
                    seed: cli.seed,
                })
            }
            (None, None) => Err(ConfigError::MissingQuerySource),
        }
    }

    fn vectors(&self) -> Result<Vec<Vec<f32>>, DecodeError> {
        match self {
            QuerySource::Document(locator) => load_query_vectors(locator),
            QuerySource::Random { nq, dim, seed } => Ok(random_vectors(*nq, *dim, *seed)),
        }
    }
}

/// Decode query vectors from the locator: a `.npy` file, a JSON file, or
/// an inline JSON document.
fn load_query_vectors(locator: &str) -> Result<Vec<Vec<f32>>, DecodeError> {
    let path = Path::new(locator);
    if path.is_file() && path.extension().is_some_and(|ext| ext == "npy") {
        Ok(read_matrix(path)?.into_vectors())
    } else {
        load_json_vectors(locator)
    }
}

/// Write the report in the configured format to the configured
/// destination.
fn write_report(results: &Results, config: &BenchConfig) -> anyhow::Result<()> {
    match &config.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            render(results, config.format, &mut file)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = std::io::stdout();
            render(results, config.format, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn render<W: Write>(results: &Results, format: OutputFormat, w: &mut W) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write_text(results, w).context("writing text report")?,
        OutputFormat::Json => write_json(results, w).context("writing json report")?,
    }
    Ok(())
}
