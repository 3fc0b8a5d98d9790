// e2e/cli_integration.rs: CLI integration tests
//
// Tests the `lzo` binary as a black-box CLI tool using std::process::Command.
// Covers compress/decompress dispatch, output naming, overwrite protection,
// stdin/stdout streaming, test mode, benchmark mode and exit codes.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Locate the `lzo` binary produced by Cargo.
fn lzo_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_lzo") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop(); // remove test binary filename
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("lzo");
    p
}

/// Create a TempDir containing a text file with ~4 KB of content.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.txt");
    let content = "Hello, LZO1X!\n".repeat(300);
    fs::write(&input_path, content).unwrap();
    (dir, input_path)
}

fn lzo() -> Command {
    let mut cmd = Command::new(lzo_bin());
    cmd.env_remove("LZO_NBWORKERS").env_remove("LZO_DISPLAY_LEVEL");
    cmd
}

// ── 1. Compress / decompress with derived names ──────────────────────────────

#[test]
fn test_cli_compress_decompress_roundtrip() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();
    let packed = dir.path().join("input.txt.lzo");

    let status = lzo().arg(&input).status().expect("failed to run lzo");
    assert!(status.success(), "compress step should exit 0");
    assert!(packed.exists(), "compressed file should exist");
    assert_eq!(
        lzo1x::decompress(&fs::read(&packed).unwrap()).unwrap(),
        original
    );

    fs::remove_file(&input).unwrap();
    let status = lzo().arg(&packed).status().expect("failed to run lzo");
    assert!(status.success(), "decompress step should exit 0");
    assert_eq!(fs::read(&input).unwrap(), original);
    assert!(packed.exists(), "source is kept by default");
}

// ── 2. Explicit output and overwrite protection ──────────────────────────────

#[test]
fn test_cli_refuses_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let out = dir.path().join("out.lzo");
    fs::write(&out, b"precious").unwrap();

    let output = lzo()
        .args(["-z", "-o"])
        .arg(&out)
        .arg(&input)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(fs::read(&out).unwrap(), b"precious");

    let status = lzo()
        .args(["-z", "-f", "-o"])
        .arg(&out)
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());
    assert_ne!(fs::read(&out).unwrap(), b"precious");
}

// ── 3. stdin → stdout ────────────────────────────────────────────────────────

#[test]
fn test_cli_stdin_stdout_pipeline() {
    let payload = b"piped through standard streams ".repeat(64);

    let mut child = lzo()
        .arg("-z")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&payload).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());
    assert_eq!(packed.stdout, lzo1x::compress(&payload));

    let mut child = lzo()
        .arg("-d")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&packed.stdout).unwrap();
    let restored = child.wait_with_output().unwrap();
    assert!(restored.status.success());
    assert_eq!(restored.stdout, payload);
}

#[test]
fn test_cli_to_stdout_flag() {
    let (_dir, input) = make_temp_input();
    let output = lzo().arg("-c").arg(&input).output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, lzo1x::compress(&fs::read(&input).unwrap()));
}

// ── 4. Test mode ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_test_mode_exit_codes() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.lzo");
    let bad = dir.path().join("bad.lzo");
    fs::write(&good, lzo1x::compress(b"all good here")).unwrap();
    fs::write(&bad, [21u8, 1, 2]).unwrap();

    assert!(lzo().arg("-t").arg(&good).status().unwrap().success());
    assert!(!lzo().arg("-t").arg(&bad).status().unwrap().success());

    let output = lzo().arg("-t").arg(&good).arg(&bad).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.lzo"));
}

// ── 5. Multiple files, removal of sources ───────────────────────────────────

#[test]
fn test_cli_multiple_files_with_rm() {
    let dir = TempDir::new().unwrap();
    let names: Vec<PathBuf> = (0..5)
        .map(|i| {
            let p = dir.path().join(format!("part{i}.txt"));
            fs::write(&p, format!("part {i} ").repeat(200)).unwrap();
            p
        })
        .collect();

    let status = lzo().args(["-z", "--rm", "-T", "2"]).args(&names).status().unwrap();
    assert!(status.success());
    for (i, p) in names.iter().enumerate() {
        assert!(!p.exists());
        let packed = fs::read(format!("{}.lzo", p.display())).unwrap();
        assert_eq!(
            lzo1x::decompress(&packed).unwrap(),
            format!("part {i} ").repeat(200).into_bytes()
        );
    }
}

// ── 6. Benchmark ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_bench_mode() {
    let (_dir, input) = make_temp_input();
    let output = lzo().args(["-b", "-i", "1"]).arg(&input).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("MB/s"));
}

// ── 7. Usage errors and version ──────────────────────────────────────────────

#[test]
fn test_cli_bad_usage_exits_nonzero() {
    let output = lzo().args(["-z", "-d", "x"]).output().unwrap();
    assert!(!output.status.success());

    let output = lzo().args(["-o", "x", "a", "b"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad usage"));
}

#[test]
fn test_cli_version() {
    let output = lzo().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_quiet_suppresses_messages() {
    let (_dir, input) = make_temp_input();
    let output = lzo().arg("-q").arg("-q").arg(&input).output().unwrap();
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}
