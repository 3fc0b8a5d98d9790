//! Binary entry point for the `lzo` command-line tool.
//!
//! # Control flow
//!
//! 1. [`parse_args`] resolves flags against the environment defaults.
//! 2. The display level is installed globally.
//! 3. [`run`] dispatches to the benchmark or the file layer and returns an
//!    exit code.

use std::process::ExitCode;

use lzo1x::bench::bench_mem;
use lzo1x::cli::args::{parse_args, ParsedArgs};
use lzo1x::cli::constants::{set_display_level, AUTHOR, PROGRAM_NAME};
use lzo1x::cli::op_mode::OpMode;
use lzo1x::displaylevel;
use lzo1x::io::{process_file, process_multiple_files};

fn run_bench(args: &ParsedArgs) -> anyhow::Result<u8> {
    let mut failed = 0u8;
    for file in &args.files {
        let data = std::fs::read(file)
            .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), e))?;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Err(e) = bench_mem(&data, &name, args.bench_iterations) {
            displaylevel!(1, "{}: {}\n", PROGRAM_NAME, e);
            failed = 1;
        }
    }
    Ok(failed)
}

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code (0 = success, 1 = at least one file failed).
fn run(args: ParsedArgs) -> anyhow::Result<u8> {
    displaylevel!(
        3,
        "*** {} v{} {}-bit, by {} ***\n",
        PROGRAM_NAME,
        lzo1x::LZO1X_VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8,
        AUTHOR
    );

    if args.op_mode == OpMode::Bench {
        return run_bench(&args);
    }

    if let [single] = args.files.as_slice() {
        process_file(single, args.output.as_deref(), args.op_mode, &args.prefs)?;
        return Ok(0);
    }

    let missed = process_multiple_files(&args.files, args.op_mode, &args.prefs)?;
    if missed > 0 {
        displaylevel!(
            1,
            "{}: {} of {} files failed\n",
            PROGRAM_NAME,
            missed,
            args.files.len()
        );
        return Ok(1);
    }
    Ok(0)
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("{}: {}", PROGRAM_NAME, e);
            return ExitCode::from(1);
        }
    };

    set_display_level(args.display_level);

    match run(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            displaylevel!(1, "{}: {:#}\n", PROGRAM_NAME, e);
            ExitCode::from(1)
        }
    }
}
