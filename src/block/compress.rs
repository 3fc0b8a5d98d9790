//! LZO1X-1 block compression.
//!
//! A greedy single-candidate LZ77 encoder. The input is processed in chunks
//! of at most [`CHUNK_SIZE`] bytes, each with a freshly cleared
//! [`D_SIZE`]-slot dictionary mapping a hash of 4 input bytes to the most
//! recent chunk-relative offset where they were seen. On a dictionary miss the
//! scan skips ahead faster the longer it has gone without a match; on a hit
//! the match is extended 8 bytes at a time and emitted immediately.
//!
//! | Rust function      | Output                                          |
//! |--------------------|-------------------------------------------------|
//! | [`compress`]       | new `Vec`, pre-sized to [`compress_bound`]      |
//! | [`compress_into`]  | caller slice, `OutputOverrun` when too small    |
//!
//! The emitted instruction forms mirror the decoder exactly; see
//! [`super::types`] for the opcode map.

use super::types::{
    compress_bound, dict_index, read_le32, read_le64, LzoError, CHUNK_SIZE, D_SIZE, EOS_MARKER,
    FIRST_LITERAL_BIAS, FIRST_LITERAL_MAX, M2_MAX_LEN, M2_MAX_OFFSET, M3_MARKER, M3_MAX_LEN,
    M3_MAX_OFFSET, M4_MARKER, M4_MAX_LEN, MIN_SEARCH_TAIL,
};

// ─────────────────────────────────────────────────────────────────────────────
// Encoder state
// ─────────────────────────────────────────────────────────────────────────────

/// Per-call encoder state. Never shared between calls.
///
/// Writes go straight into `out`; running past its end fails with
/// [`LzoError::OutputOverrun`].
struct Encoder<'a, 'o> {
    src: &'a [u8],
    out: &'o mut [u8],
    op: usize,
    dict: Vec<u32>,
}

impl<'a, 'o> Encoder<'a, 'o> {
    fn new(src: &'a [u8], out: &'o mut [u8]) -> Self {
        Self {
            src,
            out,
            op: 0,
            dict: vec![0u32; D_SIZE],
        }
    }

    #[inline]
    fn push(&mut self, b: u8) -> Result<(), LzoError> {
        *self.out.get_mut(self.op).ok_or(LzoError::OutputOverrun)? = b;
        self.op += 1;
        Ok(())
    }

    #[inline]
    fn push_slice(&mut self, bytes: &[u8]) -> Result<(), LzoError> {
        let end = self.op + bytes.len();
        self.out
            .get_mut(self.op..end)
            .ok_or(LzoError::OutputOverrun)?
            .copy_from_slice(bytes);
        self.op = end;
        Ok(())
    }

    /// Length remainder of a zero-chain encoded length: one zero per 255,
    /// closed by the non-zero rest.
    fn push_length_tail(&mut self, mut n: usize) -> Result<(), LzoError> {
        debug_assert!(n > 0);
        while n > 255 {
            n -= 255;
            self.push(0)?;
        }
        self.push(n as u8)
    }

    /// Emit a literal run that follows a match (or starts the stream in
    /// ordinary form).
    fn emit_literals(&mut self, lits: &[u8]) -> Result<(), LzoError> {
        let t = lits.len();
        if t == 0 {
            return Ok(());
        }
        if t <= 3 {
            // Fold into the low bits of the previous match's distance byte.
            debug_assert!(self.op >= 2);
            self.out[self.op - 2] |= t as u8;
        } else if t <= 18 {
            self.push((t - 3) as u8)?;
        } else {
            self.push(0)?;
            self.push_length_tail(t - 18)?;
        }
        self.push_slice(lits)
    }

    /// Emit the final literal tail, using the first-byte form when nothing
    /// has been emitted yet.
    fn emit_final_literals(&mut self, lits: &[u8]) -> Result<(), LzoError> {
        let t = lits.len();
        if self.op == 0 && t <= FIRST_LITERAL_MAX {
            self.push(FIRST_LITERAL_BIAS + t as u8)?;
            self.push_slice(lits)
        } else {
            self.emit_literals(lits)
        }
    }

    /// Emit a match of `m_len` bytes at distance `m_off`.
    fn emit_match(&mut self, m_off: usize, m_len: usize) -> Result<(), LzoError> {
        debug_assert!(m_len >= 4 && m_off >= 1);

        if m_len <= M2_MAX_LEN && m_off <= M2_MAX_OFFSET {
            let off = m_off - 1;
            self.push((((m_len - 1) << 5) | ((off & 7) << 2)) as u8)?;
            return self.push((off >> 3) as u8);
        }

        let off = if m_off <= M3_MAX_OFFSET {
            let off = m_off - 1;
            if m_len <= M3_MAX_LEN {
                self.push(M3_MARKER | (m_len - 2) as u8)?;
            } else {
                self.push(M3_MARKER)?;
                self.push_length_tail(m_len - M3_MAX_LEN)?;
            }
            off
        } else {
            let off = m_off - M3_MAX_OFFSET;
            let high = ((off >> 11) & 8) as u8;
            if m_len <= M4_MAX_LEN {
                self.push(M4_MARKER | high | (m_len - 2) as u8)?;
            } else {
                self.push(M4_MARKER | high)?;
                self.push_length_tail(m_len - M4_MAX_LEN)?;
            }
            off
        };
        self.push((off << 2) as u8)?;
        self.push((off >> 6) as u8)
    }

    /// Compress `src[start..start + in_len]`, with `ti` literal bytes still
    /// pending from before `start`. Returns the number of literal bytes left
    /// pending at the end of the chunk.
    fn compress_chunk(
        &mut self,
        start: usize,
        in_len: usize,
        mut ti: usize,
    ) -> Result<usize, LzoError> {
        let src = self.src;
        let ip_end = start + in_len - MIN_SEARCH_TAIL;
        let mut ii = start;
        let mut ip = start + if ti < 4 { 4 - ti } else { 0 };
        ip += 1 + ((ip - ii) >> 5);

        while ip < ip_end {
            let dv = read_le32(src, ip);
            let slot = dict_index(dv);
            let m_pos = start + self.dict[slot] as usize;
            self.dict[slot] = (ip - start) as u32;

            if dv != read_le32(src, m_pos) {
                ip += 1 + ((ip - ii) >> 5);
                continue;
            }

            ii -= ti;
            ti = 0;
            self.emit_literals(&src[ii..ip])?;

            let m_len = match_length(src, ip, m_pos, ip_end);
            let m_off = ip - m_pos;
            ip += m_len;
            ii = ip;
            self.emit_match(m_off, m_len)?;
        }

        Ok(start + in_len + ti - ii)
    }

    /// Encode the whole input and return the stream length.
    fn finish(mut self) -> Result<usize, LzoError> {
        let src = self.src;
        let mut ip = 0;
        let mut l = src.len();
        let mut t = 0;

        while l > MIN_SEARCH_TAIL {
            let ll = l.min(CHUNK_SIZE);
            if (t + ll) >> 5 == 0 {
                break;
            }
            self.dict.fill(0);
            t = self.compress_chunk(ip, ll, t)?;
            ip += ll;
            l -= ll;
        }
        t += l;

        if t > 0 {
            self.emit_final_literals(&src[src.len() - t..])?;
        }
        self.push_slice(&EOS_MARKER)?;
        Ok(self.op)
    }
}

/// Length of the match between `ip` and `m_pos`, whose first 4 bytes are
/// known equal. Compares a word at a time and stops once the match reaches
/// `limit`; words are read at most 8 bytes past `limit`, which the caller
/// keeps inside the input.
#[inline]
fn match_length(src: &[u8], ip: usize, m_pos: usize, limit: usize) -> usize {
    let mut len = 4;
    while ip + len < limit {
        let diff = read_le64(src, ip + len) ^ read_le64(src, m_pos + len);
        if diff != 0 {
            return len + (diff.trailing_zeros() / 8) as usize;
        }
        len += 8;
    }
    len
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src` into a new LZO1X-1 stream, terminated by the end-of-stream
/// marker. An empty input yields exactly the 3-byte marker.
pub fn compress(src: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; compress_bound(src.len())];
    // compress_bound covers the worst case, so this never overruns.
    let n = compress_into(src, &mut out).unwrap_or(0);
    out.truncate(n);
    out
}

/// Compress `src` into `dst`, returning the compressed size.
///
/// Fails with [`LzoError::OutputOverrun`] when `dst` cannot hold the stream;
/// a `dst` of [`compress_bound`] bytes always suffices.
pub fn compress_into(src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
    Encoder::new(src, dst).finish()
}
