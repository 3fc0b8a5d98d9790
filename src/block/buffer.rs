//! Output sinks for the decoder.
//!
//! [`GrowableBuffer`] starts at a capacity derived from the source length and
//! grows in [`DEFAULT_GROWTH_BLOCK_SIZE`] steps; [`FixedBuffer`] writes into a caller
//! slice and reports [`LzoError::OutputOverrun`] instead of growing.
//!
//! Both share the back-reference copy in [`copy_within_overlapping`], which
//! handles distances shorter than the match length.

use super::types::{initial_output_capacity, LzoError};
use crate::config::DEFAULT_GROWTH_BLOCK_SIZE;

/// Destination of decoded bytes.
///
/// A sink owns the write position. Implementations must leave every byte
/// below the write position untouched once written.
pub trait OutputSink {
    /// Current write position (number of bytes produced).
    fn position(&self) -> usize;

    /// Make room for `additional` more bytes past the write position.
    fn ensure_capacity(&mut self, additional: usize) -> Result<(), LzoError>;

    /// Append a literal run.
    fn put_literals(&mut self, lits: &[u8]) -> Result<(), LzoError>;

    /// Append `len` bytes copied from `distance` bytes behind the write
    /// position. `distance` may be smaller than `len`.
    fn put_match(&mut self, distance: usize, len: usize) -> Result<(), LzoError>;
}

/// Copy `len` bytes from `pos - distance` to `pos` inside `buf`.
///
/// When the regions overlap the copy proceeds in non-overlapping strides of
/// `distance` bytes, so each stride reads bytes that are already final. The
/// result equals a forward byte-by-byte copy.
///
/// The caller guarantees `1 <= distance <= pos` and `pos + len <= buf.len()`.
#[inline]
pub fn copy_within_overlapping(buf: &mut [u8], pos: usize, distance: usize, len: usize) {
    debug_assert!(distance >= 1 && distance <= pos);
    debug_assert!(pos + len <= buf.len());

    let from = pos - distance;
    if distance >= len {
        buf.copy_within(from..from + len, pos);
        return;
    }

    let mut done = 0;
    while done < len {
        let n = distance.min(len - done);
        buf.copy_within(from + done..from + done + n, pos + done);
        done += n;
    }
}

#[inline]
fn check_lookbehind(pos: usize, distance: usize) -> Result<(), LzoError> {
    if distance == 0 || distance > pos {
        Err(LzoError::LookbehindOverrun)
    } else {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GrowableBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// Heap buffer that grows by whole blocks as the decoder writes.
#[derive(Debug)]
pub struct GrowableBuffer {
    buf: Vec<u8>,
    pos: usize,
    block_size: usize,
    limit: Option<usize>,
}

impl GrowableBuffer {
    /// Buffer sized for decoding a source of `input_len` bytes.
    pub fn for_input(input_len: usize) -> Self {
        Self::with_capacity(initial_output_capacity(input_len), DEFAULT_GROWTH_BLOCK_SIZE)
    }

    /// Buffer with an explicit initial capacity and growth step.
    pub fn with_capacity(capacity: usize, block_size: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            pos: 0,
            block_size: block_size.max(1),
            limit: None,
        }
    }

    /// Refuse to hold more than `limit` bytes; writes past it fail with
    /// [`LzoError::OutputOverrun`].
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Physical capacity (always a multiple of the growth step past the
    /// initial size).
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Truncate to the write position and hand the bytes back.
    pub fn finalize(mut self) -> Vec<u8> {
        self.buf.truncate(self.pos);
        self.buf
    }

    fn grow_to(&mut self, needed: usize) -> Result<(), LzoError> {
        let mut new_cap = self.buf.len();
        while new_cap < needed {
            new_cap = new_cap
                .checked_add(self.block_size)
                .ok_or(LzoError::OutOfMemory)?;
        }
        self.buf
            .try_reserve_exact(new_cap - self.buf.len())
            .map_err(|_| LzoError::OutOfMemory)?;
        self.buf.resize(new_cap, 0);
        Ok(())
    }
}

impl OutputSink for GrowableBuffer {
    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    fn ensure_capacity(&mut self, additional: usize) -> Result<(), LzoError> {
        let needed = self
            .pos
            .checked_add(additional)
            .ok_or(LzoError::OutputOverrun)?;
        if let Some(limit) = self.limit {
            if needed > limit {
                return Err(LzoError::OutputOverrun);
            }
        }
        if needed > self.buf.len() {
            self.grow_to(needed)?;
        }
        Ok(())
    }

    fn put_literals(&mut self, lits: &[u8]) -> Result<(), LzoError> {
        self.ensure_capacity(lits.len())?;
        self.buf[self.pos..self.pos + lits.len()].copy_from_slice(lits);
        self.pos += lits.len();
        Ok(())
    }

    fn put_match(&mut self, distance: usize, len: usize) -> Result<(), LzoError> {
        check_lookbehind(self.pos, distance)?;
        self.ensure_capacity(len)?;
        copy_within_overlapping(&mut self.buf, self.pos, distance, len);
        self.pos += len;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FixedBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// Caller-provided output slice; never grows.
#[derive(Debug)]
pub struct FixedBuffer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> From<&'a mut [u8]> for FixedBuffer<'a> {
    fn from(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl FixedBuffer<'_> {
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl OutputSink for FixedBuffer<'_> {
    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    fn ensure_capacity(&mut self, additional: usize) -> Result<(), LzoError> {
        if self.buf.len() - self.pos < additional {
            Err(LzoError::OutputOverrun)
        } else {
            Ok(())
        }
    }

    fn put_literals(&mut self, lits: &[u8]) -> Result<(), LzoError> {
        self.ensure_capacity(lits.len())?;
        self.buf[self.pos..self.pos + lits.len()].copy_from_slice(lits);
        self.pos += lits.len();
        Ok(())
    }

    fn put_match(&mut self, distance: usize, len: usize) -> Result<(), LzoError> {
        check_lookbehind(self.pos, distance)?;
        self.ensure_capacity(len)?;
        copy_within_overlapping(&mut self.buf[..], self.pos, distance, len);
        self.pos += len;
        Ok(())
    }
}
