// Unit tests for io.rs: whole-file compress / decompress / test and the
// multi-file driver.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use lzo1x::block::{compress, decompress};
use lzo1x::cli::constants::set_display_level;
use lzo1x::cli::op_mode::OpMode;
use lzo1x::io::{
    compress_filename, decompress_filename, process_file, process_multiple_files, test_filename,
    Prefs,
};

fn quiet() {
    set_display_level(0);
}

fn content(seed: u8) -> Vec<u8> {
    (0..20_000u32)
        .map(|i| (i % 61) as u8 ^ seed)
        .chain(b"trailing text ".iter().copied())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Single files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compress_then_decompress_file() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.bin");
    let packed = dir.path().join("data.bin.lzo");
    let restored = dir.path().join("restored.bin");
    fs::write(&src, content(1)).unwrap();

    let prefs = Prefs::default();
    let stats = compress_filename(&src, Some(&packed), &prefs).unwrap();
    assert_eq!(stats.src_size, 20_014);
    assert_eq!(stats.dst_size, fs::metadata(&packed).unwrap().len());

    let on_disk = fs::read(&packed).unwrap();
    assert_eq!(on_disk, compress(&content(1)));
    assert_eq!(decompress(&on_disk).unwrap(), content(1));

    let stats = decompress_filename(&packed, Some(&restored), &prefs).unwrap();
    assert_eq!(stats.dst_size, 20_014);
    assert_eq!(fs::read(&restored).unwrap(), content(1));
}

#[test]
fn existing_destination_needs_overwrite() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("a");
    let dst = dir.path().join("a.lzo");
    fs::write(&src, b"payload").unwrap();
    fs::write(&dst, b"old").unwrap();

    let err = compress_filename(&src, Some(&dst), &Prefs::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(fs::read(&dst).unwrap(), b"old");

    let prefs = Prefs { overwrite: true, ..Prefs::default() };
    compress_filename(&src, Some(&dst), &prefs).unwrap();
    assert_eq!(decompress(&fs::read(&dst).unwrap()).unwrap(), b"payload");
}

#[test]
fn corrupt_stream_is_invalid_data() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.lzo");
    fs::write(&bad, [21u8, b'a', b'b']).unwrap();

    assert_eq!(test_filename(&bad).unwrap_err().kind(), ErrorKind::InvalidData);
    let out = dir.path().join("bad");
    let err = decompress_filename(&bad, Some(&out), &Prefs::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(!out.exists());
}

#[test]
fn test_filename_reports_sizes() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("ok.lzo");
    fs::write(&packed, compress(b"hello hello hello hello hello")).unwrap();
    let stats = test_filename(&packed).unwrap();
    assert_eq!(stats.dst_size, 29);
}

#[test]
fn missing_source_is_not_found() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let err = test_filename(&dir.path().join("absent.lzo")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─────────────────────────────────────────────────────────────────────────────
// process_file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn auto_mode_follows_extension() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("doc.txt");
    fs::write(&src, content(2)).unwrap();
    let prefs = Prefs::default();

    process_file(&src, None, OpMode::Auto, &prefs).unwrap();
    let packed = dir.path().join("doc.txt.lzo");
    assert!(packed.exists());

    fs::remove_file(&src).unwrap();
    process_file(&packed, None, OpMode::Auto, &prefs).unwrap();
    assert_eq!(fs::read(&src).unwrap(), content(2));
}

#[test]
fn remove_source_after_success() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("gone");
    fs::write(&src, b"bytes").unwrap();
    let prefs = Prefs { remove_src: true, ..Prefs::default() };

    process_file(&src, None, OpMode::Compress, &prefs).unwrap();
    assert!(!src.exists());
    assert!(dir.path().join("gone.lzo").exists());
}

#[test]
fn source_kept_on_failure() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("broken.lzo");
    fs::write(&src, [0u8, 0, 0]).unwrap();
    let prefs = Prefs { remove_src: true, ..Prefs::default() };

    assert!(process_file(&src, None, OpMode::Decompress, &prefs).is_err());
    assert!(src.exists());
}

#[test]
fn decompress_without_extension_needs_explicit_output() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("raw");
    fs::write(&src, compress(b"abc")).unwrap();

    let err = process_file(&src, None, OpMode::Decompress, &Prefs::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let out = dir.path().join("raw.out");
    process_file(&src, Some(&out), OpMode::Decompress, &Prefs::default()).unwrap();
    assert_eq!(fs::read(&out).unwrap(), b"abc");
}

#[test]
fn directory_source_is_rejected() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let err = process_file(dir.path(), None, OpMode::Compress, &Prefs::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ─────────────────────────────────────────────────────────────────────────────
// process_multiple_files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn many_files_in_parallel() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<PathBuf> = (0..12u8)
        .map(|i| {
            let p = dir.path().join(format!("f{i}"));
            fs::write(&p, content(i)).unwrap();
            p
        })
        .collect();
    let prefs = Prefs { nb_workers: 4, ..Prefs::default() };

    assert_eq!(process_multiple_files(&files, OpMode::Compress, &prefs).unwrap(), 0);

    let packed: Vec<PathBuf> = files
        .iter()
        .map(|f| PathBuf::from(format!("{}.lzo", f.display())))
        .collect();
    for f in &files {
        fs::remove_file(f).unwrap();
    }
    assert_eq!(process_multiple_files(&packed, OpMode::Auto, &prefs).unwrap(), 0);
    for (i, f) in files.iter().enumerate() {
        assert_eq!(fs::read(f).unwrap(), content(i as u8));
    }
}

#[test]
fn failures_are_counted_not_fatal() {
    quiet();
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.lzo");
    let bad = dir.path().join("bad.lzo");
    fs::write(&good, compress(b"fine")).unwrap();
    fs::write(&bad, b"junk").unwrap();
    let missing = dir.path().join("missing.lzo");

    let missed =
        process_multiple_files(&[good, bad, missing], OpMode::Test, &Prefs::default()).unwrap();
    assert_eq!(missed, 2);
}
