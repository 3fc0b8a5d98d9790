//! Public LZO1X block decompression API.
//!
//!   - [`decompress`]: growable output, sized from the source length
//!   - [`decompress_with_limit`]: growable output capped at a known size
//!   - [`decompress_into`]: caller-provided fixed-capacity output
//!
//! All three reject truncated streams, back-references before the start of
//! the output and writes past the available capacity.

use super::buffer::{FixedBuffer, GrowableBuffer, OutputSink};
use super::decompress_core::decompress_generic;
use super::types::LZO_E_OK;

pub use super::types::LzoError;

/// Decompress a complete LZO1X stream into a new `Vec`.
///
/// The output starts at the source length rounded up to 4 KiB and grows in
/// 4 KiB steps. Decoding stops at the end-of-stream marker; anything after it
/// is ignored.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>, LzoError> {
    let mut out = GrowableBuffer::for_input(src.len());
    decompress_generic(src, &mut out)?;
    Ok(out.finalize())
}

/// Like [`decompress`], but fails with [`LzoError::OutputOverrun`] as soon as
/// the output would exceed `max_output` bytes.
pub fn decompress_with_limit(src: &[u8], max_output: usize) -> Result<Vec<u8>, LzoError> {
    let mut out = GrowableBuffer::for_input(src.len()).with_limit(max_output);
    decompress_generic(src, &mut out)?;
    Ok(out.finalize())
}

/// Decompress into `dst`, returning the number of bytes written.
///
/// On error the contents of `dst` are unspecified.
pub fn decompress_into(src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
    let mut out: FixedBuffer = dst.into();
    decompress_generic(src, &mut out)?;
    Ok(out.position())
}

/// [`decompress`] with the classic `(output, status)` shape: the status is
/// `LZO_E_OK` or one of the negative `LZO_E_*` codes, and the output is empty
/// on failure.
pub fn decompress_with_status(src: &[u8]) -> (Vec<u8>, i32) {
    match decompress(src) {
        Ok(v) => (v, LZO_E_OK),
        Err(e) => (Vec::new(), e.code()),
    }
}
