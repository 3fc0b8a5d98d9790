//! Operation mode selection for the CLI.
//!
//! - [`OpMode`]: what the CLI should do with its inputs.
//! - [`determine_op_mode`]: infers compress vs. decompress from a filename.

use crate::config::LZO_EXTENSION;

/// What the CLI should do with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Inferred per file from its extension: decompress if `.lzo`, compress otherwise.
    Auto,
    /// Compress input to a raw LZO1X-1 stream.
    Compress,
    /// Decompress a raw LZO1X-1 stream.
    Decompress,
    /// Decode and verify without writing output.
    Test,
    /// Run the in-memory round-trip benchmark.
    Bench,
}

/// Infer the operation mode from `filename`'s extension.
pub fn determine_op_mode(filename: &str) -> OpMode {
    if filename.ends_with(LZO_EXTENSION) {
        OpMode::Decompress
    } else {
        OpMode::Compress
    }
}

/// Resolve [`OpMode::Auto`] for one file; other modes pass through.
pub fn resolve_op_mode(mode: OpMode, filename: &str) -> OpMode {
    match mode {
        OpMode::Auto => determine_op_mode(filename),
        other => other,
    }
}
