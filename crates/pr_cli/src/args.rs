// crates/pr_cli/src/args.rs
//
// Offline CLI argument surface.
// - No networked paths (reject any scheme:// like http/https/file)
// - --input is required and must be an existing local file
// - --method may repeat; strict tokens (unknown method is a usage error)
// - --tie-break / --over-alloc are kept raw and parsed leniently once logging is up
// - Seed accepts u64 decimal or 0x-hex up to 16 nybbles

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use thiserror::Error;

use pr_pipeline::Method;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "pr",
    version,
    disable_help_subcommand = true,
    about = "Offline, deterministic proportional-representation seat apportionment"
)]
pub struct Args {
    /// Districts JSON: an array of districts or {"districts": [...], "methods"?, "options"?}.
    #[arg(long)]
    pub input: PathBuf,

    /// Method to run (hare, droop, imperiali, dhondt, saintelague). Repeatable.
    /// Defaults to the document's `methods`, then to every method.
    #[arg(long = "method", value_parser = parse_method)]
    pub methods: Vec<Method>,

    /// Tie-break override (largestVotes, leastVotes, partyIndex, random, disputed).
    #[arg(long)]
    pub tie_break: Option<String>,

    /// Over-allocation override (remove-large, remove-small, increase, adjust-quota).
    #[arg(long = "over-alloc")]
    pub over_alloc: Option<String>,

    /// Barrier override as a fraction of the district total, in [0, 1].
    #[arg(long, value_parser = parse_barrier)]
    pub barrier: Option<f64>,

    /// Seed for the `random` tie-break. Accepts decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Output directory for tally.json (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Load and validate the input only; allocate nothing, write nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// Errors only on stderr; no summary on stdout.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Errors surfaced by argument validation after clap has parsed.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("path must be local file (no scheme): {0}")]
    NonLocalPath(String),
    #[error("file not found: {0}")]
    NotFound(String),
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    let mut args = Args::parse();

    ensure_local_path(&args.input)?;
    ensure_local_path(&args.out)?;
    ensure_local_exists(&args.input, "--input")?;

    args.input = normalize_path(&args.input);
    args.out = normalize_path(&args.out);
    Ok(args)
}

pub fn parse_method(s: &str) -> Result<Method, String> {
    s.parse::<Method>().map_err(|e| e.to_string())
}

pub fn parse_barrier(s: &str) -> Result<f64, String> {
    let b: f64 = s.trim().parse().map_err(|_| format!("not a number: {s}"))?;
    if !(0.0..=1.0).contains(&b) {
        return Err("barrier must be within [0, 1]".into());
    }
    Ok(b)
}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    pr_io::looks_like_url_strict(&lower)
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Absolute path; falls back to CWD-relative when the path does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}
