// crates/sv_cli/src/main.rs
//
// Exit codes, tracing setup and the three subcommands. Reports are JSON:
// canonical (sorted keys) when written with --out, pretty on stdout.

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    /// Arguments, bundle shape or settings rejected.
    pub const VALIDATION: u8 = 2;
    /// Levelling seats could not all be placed.
    pub const UNSATISFIABLE: u8 = 3;
    pub const IO: u8 = 4;
}

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use sv_algo::{disproportionality, most_vulnerable_seat, votes_to_last_seat, vulnerable_seat, SeatVulnerability};
use sv_core::results::LagueDhontResult;
use sv_core::variables::{DisproportionalityIndex, SeatLaw};
use sv_io::{canonical_json, load_bundle, IoError};
use sv_pipeline::{compute, merge, select_year, EngineError};

use args::{ensure_local_file, Cli, Command, ComputeArgs, InspectArgs, MergeArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let result = match &cli.command {
        Command::Compute(a) => run_compute(a),
        Command::Merge(a) => run_merge(a),
        Command::Inspect(a) => run_inspect(a),
    };

    match result {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            eprintln!("sv: error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Map the root cause to the exit-code table.
fn exit_code(e: &anyhow::Error) -> u8 {
    if let Some(engine) = e.downcast_ref::<EngineError>() {
        return match engine {
            EngineError::InvalidInput(_) => exitcodes::VALIDATION,
            EngineError::Unsatisfiable { .. } => exitcodes::UNSATISFIABLE,
            EngineError::Io(io) => io_exit_code(io),
        };
    }
    if let Some(io) = e.downcast_ref::<IoError>() {
        return io_exit_code(io);
    }
    if e.downcast_ref::<args::CliError>().is_some() {
        return exitcodes::VALIDATION;
    }
    exitcodes::IO
}

fn io_exit_code(e: &IoError) -> u8 {
    match e {
        IoError::Json { .. } | IoError::Invalid(_) => exitcodes::VALIDATION,
        IoError::Path(_) => exitcodes::IO,
    }
}

fn run_compute(a: &ComputeArgs) -> anyhow::Result<()> {
    ensure_local_file(&a.year.bundle)?;
    let bundle = load_bundle(&a.year.bundle)?;
    let mut payload = select_year(&bundle, a.year.year, a.year_options())?;
    a.overrides.apply(&mut payload);

    let settings = payload.settings()?;
    let run_key = payload.run_key()?;
    let result = compute(&payload)?;

    let report = json!({
        "run_key": run_key,
        "year": payload.election.year,
        "settings": settings,
        "result": result,
        "analysis": analysis(&result, a.index),
    });
    emit(&report, a.out.as_deref())
}

/// Disproportionality and last-seat vulnerability of a result.
fn analysis(result: &LagueDhontResult, index: DisproportionalityIndex) -> Value {
    let districts: Vec<Value> = result
        .district_results
        .iter()
        .map(|d| {
            json!({
                "district": d.name,
                "vulnerable_seat": vulnerable_seat(d).as_ref().map(vulnerability),
                "votes_to_last_seat": votes_to_last_seat(d),
            })
        })
        .collect();
    json!({
        "index": index,
        "disproportionality": disproportionality(&result.party_results, index),
        "most_vulnerable_seat": most_vulnerable_seat(&result.district_results).as_ref().map(vulnerability),
        "districts": districts,
    })
}

fn vulnerability(v: &SeatVulnerability) -> Value {
    let challenger = |c: &sv_algo::SeatChallenger| {
        json!({ "party_code": c.party_code, "quotient": c.quotient, "extra_votes": c.extra_votes })
    };
    json!({
        "district": v.district,
        "seat_number": v.seat_number,
        "winner": v.winner,
        "winner_quotient": v.winner_quotient,
        "closeness": v.closeness(),
        "by_quotient": challenger(&v.by_quotient),
        "by_votes": challenger(&v.by_votes),
    })
}

fn run_merge(a: &MergeArgs) -> anyhow::Result<()> {
    ensure_local_file(&a.year.bundle)?;
    let bundle = load_bundle(&a.year.bundle)?;
    let election = bundle
        .election(a.year.year)
        .ok_or_else(|| EngineError::InvalidInput(format!("no election for {}", a.year.year)))?;
    if !merge::should_merge(election.year, true) {
        tracing::warn!(year = election.year, "fixed-seat year; districts are merged for display only");
    }
    let (election, votes, metrics) = merge::merge(
        election,
        &bundle.votes_for(election.year),
        &bundle.metrics_for(election.year),
        &merge::DISTRICT_MAP,
    );
    emit(&json!({ "election": election, "votes": votes, "metrics": metrics }), a.out.as_deref())
}

fn run_inspect(a: &InspectArgs) -> anyhow::Result<()> {
    ensure_local_file(&a.bundle)?;
    let bundle = load_bundle(&a.bundle)?;
    let years: Vec<Value> = bundle
        .years()
        .into_iter()
        .map(|year| {
            let seats = bundle.election(year).map(|e| (e.district_seat_total(), e.leveling_seats, e.districts.len()));
            let (district_seats, leveling_seats, districts) = seats.unwrap_or_default();
            json!({
                "year": year,
                "seat_law": SeatLaw::for_year(year),
                "districts": districts,
                "district_seats": district_seats,
                "leveling_seats": leveling_seats,
                "votes": bundle.votes_for(year).len(),
                "metrics": bundle.metrics_for(year).len(),
                "parameters_loaded": bundle.parameters_for(year).is_loaded(),
            })
        })
        .collect();
    emit(&json!({ "years": years }), None)
}

fn emit(value: &Value, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            canonical_json::write_canonical_file(path, value)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
