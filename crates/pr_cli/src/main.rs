// crates/pr_cli/src/main.rs
//
// load → validate → (validate-only short-circuit) → run_nation → tally.json → summary

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const ALLOC: i32 = 5;
}

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use args::{parse_and_validate as parse_cli, Args};
use pr_io::canonical_json::write_canonical_file;
use pr_io::{load_districts, DistrictSet, IoError};
use pr_pipeline::{run_nation, AllocOptions, Method, NationReport, OverAllocRule, TieBreak};

const TALLY_FILE: &str = "tally.json";
const FORMAT_VERSION: u32 = 1;

/// CLI error buckets; each maps to one exit code.
#[derive(Debug, Error)]
enum MainError {
    /// JSON shape, district invariants, bad flag values.
    #[error("{0}")]
    Validation(String),
    /// Read/write/path/limits.
    #[error("{0}")]
    Io(String),
    /// The engine refused a district.
    #[error("{0}")]
    Alloc(String),
}

/// Document written to `tally.json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TallyDocument<'a> {
    format_version: u32,
    engine: EngineInfo,
    input_sha256: &'a str,
    methods: &'a [Method],
    options: &'a AllocOptions,
    #[serde(flatten)]
    report: &'a NationReport,
}

#[derive(Serialize)]
struct EngineInfo {
    name: &'static str,
    version: &'static str,
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("pr: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(&args);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("pr: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// `--quiet` / `-v` win over `RUST_LOG`; otherwise `RUST_LOG`, then `warn`.
fn init_tracing(args: &Args) {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else if args.verbose > 0 {
        EnvFilter::new(if args.verbose == 1 { "debug" } else { "trace" })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::new().compact().with_target(false).with_writer(std::io::stderr));
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let set = load_districts(&args.input).map_err(map_io_err)?;
    let methods = effective_methods(args, &set);
    let options = effective_options(args, &set);

    if args.validate_only {
        if !args.quiet {
            eprintln!("validate-only: {} district(s) OK", set.districts.len());
        }
        return Ok(());
    }

    let report = run_nation(&set.districts, &methods, &options).map_err(|e| MainError::Alloc(e.to_string()))?;

    let doc = TallyDocument {
        format_version: FORMAT_VERSION,
        engine: EngineInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
        input_sha256: &set.input_sha256,
        methods: &methods,
        options: &options,
        report: &report,
    };
    write_tally(&args.out, &doc)?;

    if !args.quiet {
        print_summary(&report);
        eprintln!("run: {} written to {}", TALLY_FILE, args.out.display());
    }
    Ok(())
}

/// Flags, then the document's `methods`, then every method. Canonical order, no repeats.
fn effective_methods(args: &Args, set: &DistrictSet) -> Vec<Method> {
    let mut methods = if !args.methods.is_empty() {
        args.methods.clone()
    } else if !set.methods.is_empty() {
        set.methods.clone()
    } else {
        Method::ALL.to_vec()
    };
    methods.sort_unstable();
    methods.dedup();
    methods
}

/// Flags override the document's `options` field by field.
fn effective_options(args: &Args, set: &DistrictSet) -> AllocOptions {
    let mut options = set.options.clone();
    if let Some(raw) = &args.tie_break {
        options.tie_break = Some(TieBreak::from_token_lossy(raw));
    }
    if let Some(raw) = &args.over_alloc {
        options.over_alloc_rule = Some(OverAllocRule::from_token_lossy(raw));
    }
    if args.barrier.is_some() {
        options.barrier = args.barrier;
    }
    if args.seed.is_some() {
        options.tie_seed = args.seed;
    }
    options
}

fn write_tally(out_dir: &Path, doc: &TallyDocument<'_>) -> Result<(), MainError> {
    let path = out_dir.join(TALLY_FILE);
    write_canonical_file(&path, doc).map_err(|e| MainError::Io(format!("write {TALLY_FILE}: {e}")))
}

fn print_summary(report: &NationReport) {
    for (method, seats) in &report.national {
        let total = report.total_seats.get(method).copied().unwrap_or(0);
        println!("{method}: {total} seats");
        for (party, n) in seats {
            println!("  {party:<24} {n:>6}");
        }
    }
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Alloc(_) => exitcodes::ALLOC,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Invalid(m) => MainError::Validation(m),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Limit(m) => MainError::Io(format!("limit: {m}")),
    }
}
