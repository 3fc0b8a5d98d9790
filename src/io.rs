//! File-level compression, decompression and integrity testing.
//!
//! Files are single raw LZO1X-1 streams: the whole input is read, coded in
//! one call and written out. The stream is self-terminating, so no framing is
//! added. Independent files are processed on a rayon pool.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::block::{compress, decompress};
use crate::cli::op_mode::{resolve_op_mode, OpMode};
use crate::config::{LZO_EXTENSION, NB_WORKERS_DEFAULT};
use crate::displaylevel;

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "-";

/// Preferences shared by every file of one invocation.
#[derive(Debug, Clone)]
pub struct Prefs {
    /// Replace existing destination files.
    pub overwrite: bool,
    /// Write results to stdout instead of a derived file name.
    pub to_stdout: bool,
    /// Delete the source after a successful operation.
    pub remove_src: bool,
    /// Worker threads for multi-file runs (0 = one per logical CPU).
    pub nb_workers: usize,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            overwrite: false,
            to_stdout: false,
            remove_src: false,
            nb_workers: NB_WORKERS_DEFAULT,
        }
    }
}

/// Sizes seen while processing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub src_size: u64,
    pub dst_size: u64,
}

fn invalid_data(path: &Path, e: impl std::fmt::Display) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{}: {}", path.display(), e),
    )
}

fn read_src(path: &Path) -> io::Result<Vec<u8>> {
    if path.as_os_str() == STDIN_MARK {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    if path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is a directory", path.display()),
        ));
    }
    fs::read(path)
}

fn write_dst(path: Option<&Path>, data: &[u8], prefs: &Prefs) -> io::Result<()> {
    let Some(path) = path else {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        return out.flush();
    };
    if path.exists() && !prefs.overwrite {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists; use -f to overwrite", path.display()),
        ));
    }
    fs::write(path, data)
}

/// Destination name for `src` under `mode`: `src.lzo` when compressing,
/// `src` without its `.lzo` suffix when decompressing. `None` when no name
/// can be derived (decompressing a file without the suffix, or stdin).
pub fn output_filename(src: &Path, mode: OpMode) -> Option<PathBuf> {
    if src.as_os_str() == STDIN_MARK {
        return None;
    }
    let name = src.to_str()?;
    match mode {
        OpMode::Compress => Some(PathBuf::from(format!("{name}{LZO_EXTENSION}"))),
        OpMode::Decompress => name
            .strip_suffix(LZO_EXTENSION)
            .filter(|stem| !stem.is_empty())
            .map(PathBuf::from),
        _ => None,
    }
}

/// Compress `src` into `dst` (stdout when `None`).
pub fn compress_filename(src: &Path, dst: Option<&Path>, prefs: &Prefs) -> io::Result<FileStats> {
    let data = read_src(src)?;
    let stream = compress(&data);
    write_dst(dst, &stream, prefs)?;
    displaylevel!(
        2,
        "Compressed {} bytes into {} bytes ==> {:.2}%\n",
        data.len(),
        stream.len(),
        stream.len() as f64 * 100.0 / data.len().max(1) as f64
    );
    Ok(FileStats {
        src_size: data.len() as u64,
        dst_size: stream.len() as u64,
    })
}

/// Decompress `src` into `dst` (stdout when `None`).
pub fn decompress_filename(
    src: &Path,
    dst: Option<&Path>,
    prefs: &Prefs,
) -> io::Result<FileStats> {
    let stream = read_src(src)?;
    let data = decompress(&stream).map_err(|e| invalid_data(src, e))?;
    write_dst(dst, &data, prefs)?;
    displaylevel!(2, "{}: decoded {} bytes\n", src.display(), data.len());
    Ok(FileStats {
        src_size: stream.len() as u64,
        dst_size: data.len() as u64,
    })
}

/// Decode `src` and discard the output; fails on any stream error.
pub fn test_filename(src: &Path) -> io::Result<FileStats> {
    let stream = read_src(src)?;
    let data = decompress(&stream).map_err(|e| invalid_data(src, e))?;
    displaylevel!(
        2,
        "{}: OK ({} bytes, xxh64 {:016x})\n",
        src.display(),
        data.len(),
        crate::xxhash::xxh64_oneshot(&data)
    );
    Ok(FileStats {
        src_size: stream.len() as u64,
        dst_size: data.len() as u64,
    })
}

/// Run `mode` on one file, deriving the destination unless `dst` is given.
pub fn process_file(
    src: &Path,
    dst: Option<&Path>,
    mode: OpMode,
    prefs: &Prefs,
) -> io::Result<FileStats> {
    let mode = resolve_op_mode(mode, &src.to_string_lossy());
    if mode == OpMode::Test {
        return test_filename(src);
    }

    let derived;
    let dst = if prefs.to_stdout {
        None
    } else if let Some(dst) = dst {
        Some(dst)
    } else {
        derived = output_filename(src, mode).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{}: cannot derive output name (expected {} suffix)",
                    src.display(),
                    LZO_EXTENSION
                ),
            )
        })?;
        Some(derived.as_path())
    };

    let stats = match mode {
        OpMode::Decompress => decompress_filename(src, dst, prefs)?,
        _ => compress_filename(src, dst, prefs)?,
    };

    if prefs.remove_src && src.as_os_str() != STDIN_MARK {
        fs::remove_file(src)?;
    }
    Ok(stats)
}

/// Process several files with derived destination names. Files run in
/// parallel unless output goes to stdout. Returns the number of files that
/// failed; each failure is reported at display level 1.
pub fn process_multiple_files(files: &[PathBuf], mode: OpMode, prefs: &Prefs) -> io::Result<usize> {
    let run = |src: &PathBuf| match process_file(src, None, mode, prefs) {
        Ok(_) => 0usize,
        Err(e) => {
            displaylevel!(1, "lzo: {}\n", e);
            1
        }
    };

    if prefs.to_stdout {
        return Ok(files.iter().map(run).sum());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(prefs.nb_workers)
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    displaylevel!(
        3,
        "processing {} files on {} workers\n",
        files.len(),
        pool.current_num_threads()
    );
    Ok(pool.install(|| files.par_iter().map(run).sum()))
}
