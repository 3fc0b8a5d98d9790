//! LZO1X-1 block compression and decompression.
//!
//! This module contains the codec engine: the opcode-stream decoder, the
//! greedy hash-based encoder, and the output buffers they write into.

pub mod buffer;
pub mod compress;
pub mod decompress_api;
pub mod decompress_core;
pub mod types;

// Re-export the most important public API items at the module level.
pub use buffer::{FixedBuffer, GrowableBuffer, OutputSink};
pub use compress::{compress, compress_into};
pub use decompress_api::{decompress, decompress_into, decompress_with_limit, decompress_with_status};
pub use types::{
    compress_bound, status_code, LzoError, EOS_MARKER, LZO_E_INPUT_OVERRUN,
    LZO_E_LOOKBEHIND_OVERRUN, LZO_E_OK, LZO_E_OUTPUT_OVERRUN, LZO_E_OUT_OF_MEMORY,
};
