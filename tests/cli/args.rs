// Unit tests for cli/args.rs: flag resolution against environment defaults.

use std::path::PathBuf;

use lzo1x::cli::args::{parse_args_from, EnvDefaults};
use lzo1x::cli::op_mode::OpMode;

const DEFAULTS: EnvDefaults = EnvDefaults {
    nb_workers: 0,
    display_level: 2,
};

fn parse(args: &[&str]) -> anyhow::Result<lzo1x::cli::args::ParsedArgs> {
    let mut argv = vec!["lzo"];
    argv.extend_from_slice(args);
    parse_args_from(argv, DEFAULTS)
}

// ─────────────────────────────────────────────────────────────────────────────
// Modes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn no_mode_flag_is_auto() {
    assert_eq!(parse(&["a"]).unwrap().op_mode, OpMode::Auto);
}

#[test]
fn mode_flags() {
    assert_eq!(parse(&["-z", "a"]).unwrap().op_mode, OpMode::Compress);
    assert_eq!(parse(&["-d", "a.lzo"]).unwrap().op_mode, OpMode::Decompress);
    assert_eq!(parse(&["--uncompress", "a.lzo"]).unwrap().op_mode, OpMode::Decompress);
    assert_eq!(parse(&["-t", "a.lzo"]).unwrap().op_mode, OpMode::Test);
    assert_eq!(parse(&["-b", "a"]).unwrap().op_mode, OpMode::Bench);
}

#[test]
fn conflicting_modes_are_rejected() {
    assert!(parse(&["-z", "-d", "a"]).is_err());
    assert!(parse(&["-t", "-b", "a"]).is_err());
}

#[test]
fn help_surfaces_as_clap_error() {
    let err = parse(&["--help"]).unwrap_err();
    assert!(err.downcast_ref::<clap::Error>().is_some());
}

// ─────────────────────────────────────────────────────────────────────────────
// Files and output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn no_files_reads_stdin_to_stdout() {
    let args = parse(&["-d"]).unwrap();
    assert_eq!(args.files, vec![PathBuf::from("-")]);
    assert!(args.prefs.to_stdout);
}

#[test]
fn named_files_do_not_imply_stdout() {
    let args = parse(&["a", "b"]).unwrap();
    assert_eq!(args.files, vec![PathBuf::from("a"), PathBuf::from("b")]);
    assert!(!args.prefs.to_stdout);
}

#[test]
fn stdin_with_explicit_output() {
    let args = parse(&["-o", "out.lzo", "-"]).unwrap();
    assert!(!args.prefs.to_stdout);
    assert_eq!(args.output, Some(PathBuf::from("out.lzo")));
}

#[test]
fn output_with_several_inputs_is_bad_usage() {
    let err = parse(&["-o", "x", "a", "b"]).unwrap_err();
    assert!(err.to_string().starts_with("bad usage: "));
}

#[test]
fn output_and_stdout_are_exclusive() {
    let err = parse(&["-c", "-o", "x", "a"]).unwrap_err();
    assert!(err.to_string().starts_with("bad usage: "));
}

#[test]
fn stdin_mixed_with_files_is_bad_usage() {
    assert!(parse(&["a", "-"]).is_err());
}

#[test]
fn bench_without_files_is_bad_usage() {
    let err = parse(&["-b"]).unwrap_err();
    assert!(err.to_string().starts_with("bad usage: "));
}

// ─────────────────────────────────────────────────────────────────────────────
// Preferences
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn force_stdout_and_rm() {
    let args = parse(&["-f", "-c", "--rm", "a"]).unwrap();
    assert!(args.prefs.overwrite);
    assert!(args.prefs.to_stdout);
    assert!(args.prefs.remove_src);
}

#[test]
fn keep_overrides_earlier_rm() {
    let args = parse(&["--rm", "-k", "a"]).unwrap();
    assert!(!args.prefs.remove_src);
    let args = parse(&["-k", "--rm", "a"]).unwrap();
    assert!(args.prefs.remove_src);
}

#[test]
fn threads_flag_overrides_environment() {
    let args = parse_args_from(
        ["lzo", "-T", "3", "a"],
        EnvDefaults { nb_workers: 8, display_level: 2 },
    )
    .unwrap();
    assert_eq!(args.prefs.nb_workers, 3);

    let args = parse_args_from(["lzo", "a"], EnvDefaults { nb_workers: 8, display_level: 2 })
        .unwrap();
    assert_eq!(args.prefs.nb_workers, 8);
}

#[test]
fn threads_clamped_to_max() {
    assert_eq!(parse(&["-T", "1000", "a"]).unwrap().prefs.nb_workers, 200);
}

#[test]
fn verbosity_counts_from_environment_level() {
    assert_eq!(parse(&["a"]).unwrap().display_level, 2);
    assert_eq!(parse(&["-v", "a"]).unwrap().display_level, 3);
    assert_eq!(parse(&["-vvvvv", "a"]).unwrap().display_level, 4);
    assert_eq!(parse(&["-q", "a"]).unwrap().display_level, 1);
    assert_eq!(parse(&["-qqq", "a"]).unwrap().display_level, 0);
    assert_eq!(parse(&["-v", "-q", "a"]).unwrap().display_level, 2);
}

#[test]
fn bench_iterations() {
    assert_eq!(parse(&["-b", "a"]).unwrap().bench_iterations, 3);
    assert_eq!(parse(&["-b", "-i", "7", "a"]).unwrap().bench_iterations, 7);
    assert_eq!(parse(&["-b", "-i", "0", "a"]).unwrap().bench_iterations, 1);
}
