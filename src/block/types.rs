//! LZO1X-1 block constants, status codes, the error type, hashing and the
//! input cursor shared by the encoder and decoder.
//!
//! Layout of the opcode space (first byte of an instruction):
//!
//! | Range      | Meaning                                                    |
//! |------------|------------------------------------------------------------|
//! | `0..=15`   | literal run (after a match) / short match (after literals) |
//! | `16..=31`  | far match, distance `0x4000..=0xBFFF`, or end of stream    |
//! | `32..=63`  | medium match, distance `1..=0x4000`                        |
//! | `64..=255` | near match, length `3..=8`, distance `1..=0x800`           |

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Constants: wire format
// ─────────────────────────────────────────────────────────────────────────────

/// A first byte above this value encodes an initial literal run of `byte - 17`.
pub const FIRST_LITERAL_BIAS: u8 = 17;

/// Longest initial literal run expressible by the first-byte form.
pub const FIRST_LITERAL_MAX: usize = 255 - FIRST_LITERAL_BIAS as usize;

/// Maximum distance of a near (`64..=255`) match and base of the 3-byte
/// short match that may follow a full literal run.
pub const M2_MAX_OFFSET: usize = 0x0800;
/// Maximum length of a near match.
pub const M2_MAX_LEN: usize = 8;
/// Maximum distance of a medium (`32..=63`) match.
pub const M3_MAX_OFFSET: usize = 0x4000;
/// Longest medium match encodable without the zero-byte chain.
pub const M3_MAX_LEN: usize = 33;
/// Longest far match encodable without the zero-byte chain.
pub const M4_MAX_LEN: usize = 9;
/// Opcode markers for the medium and far forms.
pub const M3_MARKER: u8 = 32;
pub const M4_MARKER: u8 = 16;

/// The 3-byte end-of-stream instruction: a far match whose distance field is 0.
pub const EOS_MARKER: [u8; 3] = [M4_MARKER | 1, 0, 0];

// ─────────────────────────────────────────────────────────────────────────────
// Constants: engine sizing
// ─────────────────────────────────────────────────────────────────────────────

pub const KB: usize = 1 << 10;

/// Growth step (and rounding granularity) of the decompression output buffer.
pub const OUTPUT_BLOCK_SIZE: usize = 4 * KB;

/// log2 of the number of hash-dictionary slots.
pub const D_BITS: u32 = 14;
/// Number of hash-dictionary slots.
pub const D_SIZE: usize = 1 << D_BITS;
/// Mask applied to a dictionary index.
pub const D_MASK: usize = D_SIZE - 1;

/// Largest span of input compressed with one dictionary lifetime.
pub const CHUNK_SIZE: usize = 48 * KB;

/// Inputs (or chunk remainders) of at most this many bytes are never searched.
pub const MIN_SEARCH_TAIL: usize = 20;

// ─────────────────────────────────────────────────────────────────────────────
// Status codes
// ─────────────────────────────────────────────────────────────────────────────

pub const LZO_E_OK: i32 = 0;
pub const LZO_E_OUT_OF_MEMORY: i32 = -2;
pub const LZO_E_INPUT_OVERRUN: i32 = -4;
pub const LZO_E_OUTPUT_OVERRUN: i32 = -5;
pub const LZO_E_LOOKBEHIND_OVERRUN: i32 = -6;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by LZO1X block decompression and by the output buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzoError {
    /// The source ended in the middle of an instruction, or before the
    /// end-of-stream marker.
    InputOverrun,
    /// The stream would write past the output capacity or the caller's limit.
    OutputOverrun,
    /// A back-reference points before the start of the output.
    LookbehindOverrun,
    /// The output buffer could not be grown.
    OutOfMemory,
}

impl LzoError {
    /// The classic integer status code for this error.
    pub fn code(self) -> i32 {
        match self {
            LzoError::InputOverrun => LZO_E_INPUT_OVERRUN,
            LzoError::OutputOverrun => LZO_E_OUTPUT_OVERRUN,
            LzoError::LookbehindOverrun => LZO_E_LOOKBEHIND_OVERRUN,
            LzoError::OutOfMemory => LZO_E_OUT_OF_MEMORY,
        }
    }
}

impl fmt::Display for LzoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LzoError::InputOverrun => write!(f, "input overrun"),
            LzoError::OutputOverrun => write!(f, "output overrun"),
            LzoError::LookbehindOverrun => write!(f, "lookbehind overrun"),
            LzoError::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl std::error::Error for LzoError {}

/// Maps a codec result onto its integer status code (`LZO_E_OK` on success).
pub fn status_code<T>(result: &Result<T, LzoError>) -> i32 {
    match result {
        Ok(_) => LZO_E_OK,
        Err(e) => e.code(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sizing
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size of `input_len` bytes.
#[inline]
pub fn compress_bound(input_len: usize) -> usize {
    input_len + input_len.div_ceil(16) + 64 + 3
}

/// Initial capacity of the decompression buffer for a source of `input_len`
/// bytes: the input length rounded up to the next [`OUTPUT_BLOCK_SIZE`]
/// boundary (always at least one block).
#[inline]
pub fn initial_output_capacity(input_len: usize) -> usize {
    input_len + (OUTPUT_BLOCK_SIZE - input_len % OUTPUT_BLOCK_SIZE)
}

// ─────────────────────────────────────────────────────────────────────────────
// Hashing
// ─────────────────────────────────────────────────────────────────────────────

/// Read 4 bytes little-endian at `pos`.
#[inline(always)]
pub fn read_le32(src: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([src[pos], src[pos + 1], src[pos + 2], src[pos + 3]])
}

/// Read 8 bytes little-endian at `pos`.
#[inline(always)]
pub fn read_le64(src: &[u8], pos: usize) -> u64 {
    let mut w = [0u8; 8];
    w.copy_from_slice(&src[pos..pos + 8]);
    u64::from_le_bytes(w)
}

/// Dictionary slot for the 4-byte window `dv`: the top 14 bits of
/// `dv * 0x1824429d` taken modulo 2^32.
#[inline(always)]
pub fn dict_index(dv: u32) -> usize {
    (dv.wrapping_mul(0x1824_429d) >> (32 - D_BITS)) as usize & D_MASK
}

// ─────────────────────────────────────────────────────────────────────────────
// Input cursor
// ─────────────────────────────────────────────────────────────────────────────

/// Bounds-checked read cursor over a compressed source.
///
/// Every accessor either returns the requested bytes and advances, or fails
/// with [`LzoError::InputOverrun`] without moving.
#[derive(Debug, Clone, Copy)]
pub struct InputCursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> InputCursor<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.src.len() - self.pos
    }

    /// Look at the next byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Result<u8, LzoError> {
        self.src.get(self.pos).copied().ok_or(LzoError::InputOverrun)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, LzoError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    /// Borrow the next `n` bytes.
    #[inline]
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], LzoError> {
        if self.remaining() < n {
            return Err(LzoError::InputOverrun);
        }
        let s = &self.src[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    /// Read a length extension: a run of zero bytes (255 each) closed by a
    /// non-zero byte, added to `base`.
    pub fn read_zero_chain(&mut self, base: usize) -> Result<usize, LzoError> {
        let mut len = base;
        while self.peek()? == 0 {
            len = len.checked_add(255).ok_or(LzoError::OutputOverrun)?;
            self.pos += 1;
        }
        let last = self.read_u8()? as usize;
        len.checked_add(last).ok_or(LzoError::OutputOverrun)
    }

    /// Read the two distance bytes of a medium or far match.
    ///
    /// Returns `(distance_field, trailing_literals)` where the distance field
    /// is `(b0 >> 2) + (b1 << 6)` and the trailing-literal count is `b0 & 3`.
    #[inline]
    pub fn read_distance14(&mut self) -> Result<(usize, usize), LzoError> {
        let b = self.take(2)?;
        let b0 = b[0] as usize;
        let b1 = b[1] as usize;
        Ok(((b0 >> 2) + (b1 << 6), b0 & 3))
    }
}
