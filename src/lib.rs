// lzo1x: LZO1X-1 block codec, dictionary-file block decoder and `lzo` tool

pub mod config;
pub mod block;
pub mod container;
pub mod xxhash;
pub mod bench;
pub mod io;
pub mod cli;
#[cfg(feature = "c-abi")]
pub mod abi;

// ── Version constants ────────────────────────────────────────────────────────
pub const LZO1X_VERSION_MAJOR: u32 = 0;
pub const LZO1X_VERSION_MINOR: u32 = 3;
pub const LZO1X_VERSION_RELEASE: u32 = 0;
pub const LZO1X_VERSION_NUMBER: u32 =
    LZO1X_VERSION_MAJOR * 100 * 100 + LZO1X_VERSION_MINOR * 100 + LZO1X_VERSION_RELEASE;
pub const LZO1X_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the runtime version number.
pub fn version_number() -> u32 {
    LZO1X_VERSION_NUMBER
}

/// Returns the runtime version string.
pub fn version_string() -> &'static str {
    LZO1X_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::{
    compress, compress_bound, compress_into, decompress, decompress_into, decompress_with_limit,
    decompress_with_status, LzoError,
};
pub use container::{decode_block, decode_blocks, encode_block, BlockMethod, ContainerError};
