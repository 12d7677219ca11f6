// crates/sv_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
// - Bundle paths must be local (no scheme://) and exist as regular files
// - Setting overrides replace the historical values of the selected year
// - Out-of-domain numbers are left to the engine (exit code 2 either way)

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use sv_core::variables::{AlgorithmType, DisproportionalityIndex};
use sv_pipeline::{ComputationPayload, YearOptions};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "sv",
    version,
    disable_help_subcommand = true,
    about = "Offline, deterministic Storting seat computations"
)]
pub struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute district and levelling seats for one year.
    Compute(ComputeArgs),
    /// Print one year's records with legacy counties merged.
    Merge(MergeArgs),
    /// List the years of a bundle and their seat laws.
    Inspect(InspectArgs),
}

/// Year selection shared by `compute` and `merge`.
#[derive(Debug, ClapArgs, Clone)]
pub struct YearArgs {
    /// Election bundle JSON path.
    #[arg(long)]
    pub bundle: PathBuf,
    /// Election year.
    #[arg(long)]
    pub year: u16,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub year: YearArgs,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Fold legacy counties into today's (area-formula years only).
    #[arg(long)]
    pub merge_districts: bool,
    /// Distribute district seats with the 2021 metrics.
    #[arg(long = "use-2021-distribution")]
    pub use_2021_distribution: bool,

    /// Disproportionality index reported with the result.
    #[arg(long, value_parser = parse_index, default_value = "gallagher")]
    pub index: DisproportionalityIndex,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl ComputeArgs {
    pub fn year_options(&self) -> YearOptions {
        YearOptions { merge_districts: self.merge_districts, use_2021_distribution: self.use_2021_distribution }
    }
}

/// Settings that replace the historical ones.
#[derive(Debug, ClapArgs, Clone, Default)]
pub struct Overrides {
    /// sainte_lague | modified_sainte_lague | d_hondt | largest_fraction_hare | largest_fraction_droop
    #[arg(long, value_parser = parse_algorithm)]
    pub algorithm: Option<AlgorithmType>,
    #[arg(long)]
    pub first_divisor: Option<f64>,
    /// National threshold for levelling seats (percent).
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Threshold within each district (percent).
    #[arg(long)]
    pub district_threshold: Option<f64>,
    #[arg(long)]
    pub district_seats: Option<u32>,
    #[arg(long)]
    pub leveling_seats: Option<u32>,
    #[arg(long)]
    pub area_factor: Option<f64>,
}

impl Overrides {
    pub fn apply(&self, p: &mut ComputationPayload) {
        if let Some(a) = self.algorithm {
            p.algorithm = a;
        }
        if let Some(v) = self.first_divisor {
            p.first_divisor = v;
        }
        if let Some(v) = self.threshold {
            p.election_threshold = v;
        }
        if let Some(v) = self.district_threshold {
            p.district_threshold = v;
        }
        if let Some(v) = self.district_seats {
            p.district_seats = v;
        }
        if let Some(v) = self.leveling_seats {
            p.leveling_seats = v;
        }
        if let Some(v) = self.area_factor {
            p.area_factor = v;
        }
    }
}

#[derive(Debug, ClapArgs, Clone)]
pub struct MergeArgs {
    #[command(flatten)]
    pub year: YearArgs,
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct InspectArgs {
    #[arg(long)]
    pub bundle: PathBuf,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

pub fn parse_algorithm(s: &str) -> Result<AlgorithmType, String> {
    s.parse().map_err(|_| {
        let all: Vec<&str> = AlgorithmType::ALL.iter().map(|a| a.as_token()).collect();
        format!("expected one of {}", all.join(", "))
    })
}

pub fn parse_index(s: &str) -> Result<DisproportionalityIndex, String> {
    s.parse().map_err(|_| "expected loosemore_hanby or gallagher".to_string())
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

/// Ensure a path is local (no scheme) and exists as a regular file.
pub fn ensure_local_file(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    match fs::metadata(p) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(CliError::NotFound(p.display().to_string())),
    }
}
