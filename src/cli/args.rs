//! Command-line argument parsing for `lzo`.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit argument list, suitable for
//! unit-testing). Both return a [`ParsedArgs`] value with every option
//! resolved against the environment defaults in [`EnvDefaults`].
//!
//! Inconsistent option combinations return an `Err` whose message begins
//! with `"bad usage: "`. `--help` and `--version` surface as a
//! [`clap::Error`] inside the `anyhow::Error`; the caller lets clap print
//! and exit.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, ArgGroup, Parser};

use crate::cli::op_mode::OpMode;
use crate::config::{
    init_display_level, init_nb_workers, BENCH_ITERATIONS_DEFAULT, DISPLAY_LEVEL_MAX,
    NB_WORKERS_MAX,
};
use crate::io::{Prefs, STDIN_MARK};

// ── clap surface ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lzo", version, about = "Compress or decompress raw LZO1X-1 streams", long_about = None)]
#[command(group(ArgGroup::new("mode").args(["compress", "decompress", "test", "bench"])))]
#[command(after_help = "EXAMPLES:
    lzo file              Compress file into file.lzo
    lzo file.lzo          Decompress file.lzo into file
    lzo -t *.lzo          Check every .lzo file decodes
    lzo -c file > out     Compress to standard output
    lzo -b -i 5 file      Benchmark compression of file")]
struct Cli {
    /// Compress (default unless the input ends in .lzo)
    #[arg(short = 'z', long)]
    compress: bool,

    /// Decompress
    #[arg(short, long, visible_alias = "uncompress")]
    decompress: bool,

    /// Test integrity: decode and discard
    #[arg(short, long)]
    test: bool,

    /// Benchmark in memory
    #[arg(short, long)]
    bench: bool,

    /// Overwrite existing output files
    #[arg(short, long)]
    force: bool,

    /// Write to standard output
    #[arg(short = 'c', long = "stdout", visible_alias = "to-stdout")]
    stdout: bool,

    /// Keep source files (default)
    #[arg(short, long, overrides_with = "rm")]
    keep: bool,

    /// Remove source files after success
    #[arg(long, overrides_with = "keep")]
    rm: bool,

    /// More messages (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Fewer messages (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    quiet: u8,

    /// Worker threads for multiple files (0 = one per CPU)
    #[arg(short = 'T', long = "threads", value_name = "N")]
    threads: Option<usize>,

    /// Benchmark iterations
    #[arg(short, long, value_name = "N")]
    iterations: Option<u32>,

    /// Output file (single input only)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Input files; `-` or none reads standard input
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

// ── Public output type ────────────────────────────────────────────────────────

/// Starting values taken from the environment before flags are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvDefaults {
    pub nb_workers: usize,
    pub display_level: u32,
}

impl EnvDefaults {
    /// Read `LZO_NBWORKERS` and `LZO_DISPLAY_LEVEL`.
    pub fn from_env() -> Self {
        Self {
            nb_workers: init_nb_workers(),
            display_level: init_display_level(),
        }
    }
}

/// Fully resolved command line.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub op_mode: OpMode,
    pub prefs: Prefs,
    /// Display level after `-v` / `-q`, clamped to `DISPLAY_LEVEL_MAX`.
    pub display_level: u32,
    pub bench_iterations: u32,
    /// Explicit output path (`-o`).
    pub output: Option<PathBuf>,
    /// Inputs; contains `STDIN_MARK` alone when none were named.
    pub files: Vec<PathBuf>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` against the environment defaults.
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    parse_args_from(std::env::args_os(), EnvDefaults::from_env())
}

/// Parse an explicit argument list; the first item is the program name.
pub fn parse_args_from<I, T>(argv: I, defaults: EnvDefaults) -> anyhow::Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv)?;

    let op_mode = if cli.compress {
        OpMode::Compress
    } else if cli.decompress {
        OpMode::Decompress
    } else if cli.test {
        OpMode::Test
    } else if cli.bench {
        OpMode::Bench
    } else {
        OpMode::Auto
    };

    let mut files = cli.files;
    if files.is_empty() {
        if op_mode == OpMode::Bench {
            return Err(anyhow!("bad usage: benchmark needs at least one input file"));
        }
        files.push(PathBuf::from(STDIN_MARK));
    }

    if cli.output.is_some() && files.len() > 1 {
        return Err(anyhow!("bad usage: -o cannot be used with multiple input files"));
    }
    if cli.output.is_some() && cli.stdout {
        return Err(anyhow!("bad usage: -o and -c are mutually exclusive"));
    }

    let reads_stdin = files.iter().any(|f| f.as_os_str() == STDIN_MARK);
    if reads_stdin && files.len() > 1 {
        return Err(anyhow!("bad usage: standard input cannot be combined with other files"));
    }
    // Nothing to derive an output name from: stream through.
    let to_stdout = cli.stdout || (reads_stdin && cli.output.is_none());

    let display_level = (defaults.display_level + u32::from(cli.verbose))
        .saturating_sub(u32::from(cli.quiet))
        .min(DISPLAY_LEVEL_MAX);

    let prefs = Prefs {
        overwrite: cli.force,
        to_stdout,
        remove_src: cli.rm && !cli.keep,
        nb_workers: cli.threads.unwrap_or(defaults.nb_workers).min(NB_WORKERS_MAX),
    };

    Ok(ParsedArgs {
        op_mode,
        prefs,
        display_level,
        bench_iterations: cli.iterations.unwrap_or(BENCH_ITERATIONS_DEFAULT).max(1),
        output: cli.output,
        files,
    })
}
