// Unit tests for io.rs: destination name derivation.

use std::path::{Path, PathBuf};

use lzo1x::cli::op_mode::OpMode;
use lzo1x::io::{output_filename, STDIN_MARK};

#[test]
fn compress_appends_extension() {
    assert_eq!(
        output_filename(Path::new("dir/notes.txt"), OpMode::Compress),
        Some(PathBuf::from("dir/notes.txt.lzo"))
    );
}

#[test]
fn decompress_strips_extension() {
    assert_eq!(
        output_filename(Path::new("dir/notes.txt.lzo"), OpMode::Decompress),
        Some(PathBuf::from("dir/notes.txt"))
    );
}

#[test]
fn decompress_without_extension_has_no_name() {
    assert_eq!(output_filename(Path::new("notes.txt"), OpMode::Decompress), None);
    assert_eq!(output_filename(Path::new(".lzo"), OpMode::Decompress), None);
}

#[test]
fn stdin_has_no_name() {
    assert_eq!(output_filename(Path::new(STDIN_MARK), OpMode::Compress), None);
}

#[test]
fn test_and_bench_have_no_name() {
    assert_eq!(output_filename(Path::new("a"), OpMode::Test), None);
    assert_eq!(output_filename(Path::new("a"), OpMode::Bench), None);
}
